use async_trait::async_trait;
use edgequake_pdf2podcast::{LanguageModel, ServiceError};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

/// Language model that replays scripted replies in call order.
///
/// `Ok(text)` is returned as the completion, `Err(msg)` as a provider error.
/// Running out of replies is reported as an error too.
#[derive(Clone)]
pub struct MockModel {
    pub replies: Arc<Mutex<VecDeque<Result<String, String>>>>,
    pub calls: Arc<Mutex<Vec<String>>>,
}

impl MockModel {
    pub fn scripted(replies: Vec<Result<&str, &str>>) -> Self {
        Self {
            replies: Arc::new(Mutex::new(
                replies
                    .into_iter()
                    .map(|r| r.map(str::to_string).map_err(str::to_string))
                    .collect(),
            )),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Replies for a fully successful run: summary, key points, script.
    pub fn happy(summary: &str, key_points: &str, script: &str) -> Self {
        Self::scripted(vec![Ok(summary), Ok(key_points), Ok(script)])
    }

    pub fn prompts(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl LanguageModel for MockModel {
    async fn complete(&self, prompt: &str) -> Result<String, ServiceError> {
        self.calls.lock().unwrap().push(prompt.to_string());
        match self.replies.lock().unwrap().pop_front() {
            Some(Ok(text)) => Ok(text),
            Some(Err(msg)) => Err(ServiceError::Provider(msg)),
            None => Err(ServiceError::Provider("no scripted reply left".into())),
        }
    }
}
