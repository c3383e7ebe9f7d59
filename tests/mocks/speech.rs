use async_trait::async_trait;
use edgequake_pdf2podcast::{ServiceError, SpeechSynthesizer};
use std::sync::{Arc, Mutex};

/// Speech service that encodes each input as `<text>` bytes.
#[derive(Clone, Default)]
pub struct MockSpeech {
    pub calls: Arc<Mutex<Vec<String>>>,
    /// 1-based call number that fails, with its message.
    pub fail_on: Option<(usize, String)>,
}

impl MockSpeech {
    pub fn failing_on(call: usize, msg: &str) -> Self {
        Self {
            calls: Arc::new(Mutex::new(Vec::new())),
            fail_on: Some((call, msg.to_string())),
        }
    }

    pub fn inputs(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn encode(text: &str) -> Vec<u8> {
        format!("<{text}>").into_bytes()
    }
}

#[async_trait]
impl SpeechSynthesizer for MockSpeech {
    async fn synthesize(&self, text: &str) -> Result<Vec<u8>, ServiceError> {
        let call = {
            let mut calls = self.calls.lock().unwrap();
            calls.push(text.to_string());
            calls.len()
        };
        if let Some((n, ref msg)) = self.fail_on {
            if n == call {
                return Err(ServiceError::Api {
                    status: 500,
                    message: msg.clone(),
                });
            }
        }
        Ok(Self::encode(text))
    }
}
