mod mocks;

use edgequake_pdf2podcast::pipeline::audio::split_script;
use edgequake_pdf2podcast::prompts::{key_points_prompt, podcast_script_prompt, summarize_prompt};
use edgequake_pdf2podcast::{
    FailurePolicy, PipelineProgressCallback, PodcastConfig, PodcastPipeline, Stage, StageError,
    Step,
};
use mocks::{model::MockModel, speech::MockSpeech};
use std::sync::{Arc, Mutex};

fn pipeline(model: &MockModel, speech: &MockSpeech, config: PodcastConfig) -> PodcastPipeline {
    PodcastPipeline::new(Arc::new(model.clone()), Arc::new(speech.clone()), config)
}

fn document(chars: usize) -> String {
    "The quick brown fox jumps over the lazy dog. "
        .chars()
        .cycle()
        .take(chars)
        .collect()
}

fn long_script(sentences: usize) -> String {
    (0..sentences)
        .map(|i| format!("Sentence number {i:04} of the episode {}", "z".repeat(70)))
        .collect::<Vec<_>>()
        .join(". ")
        + "."
}

// ─── Happy path ──────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_happy_path_fills_every_field() {
    let model = MockModel::happy(
        "A concise summary.",
        "1. First\n\n2. Second\n3. Third\n",
        "Hello listeners. Welcome to the show.",
    );
    let speech = MockSpeech::default();
    let source = document(500);

    let state = pipeline(&model, &speech, PodcastConfig::default())
        .run(source.clone())
        .await;

    assert!(state.error.is_none());
    assert_eq!(state.source_text, source);
    assert_eq!(state.summary, "A concise summary.");
    assert_eq!(state.key_points, vec!["1. First", "2. Second", "3. Third"]);
    assert_eq!(state.script, "Hello listeners. Welcome to the show.");
    assert_eq!(state.audio_segments.len(), 1);
    assert_eq!(
        state.final_audio,
        Some(MockSpeech::encode("Hello listeners. Welcome to the show."))
    );
    assert_eq!(state.current_step, Step::AudioComplete);
}

#[tokio::test]
async fn test_stages_receive_previous_outputs() {
    let model = MockModel::happy("Summary text", "Point A\nPoint B", "Script body.");
    let speech = MockSpeech::default();
    let source = document(300);

    pipeline(&model, &speech, PodcastConfig::default())
        .run(source.clone())
        .await;

    let prompts = model.prompts();
    assert_eq!(prompts.len(), 3);
    assert_eq!(prompts[0], summarize_prompt(&source));
    assert_eq!(prompts[1], key_points_prompt("Summary text"));
    assert_eq!(
        prompts[2],
        podcast_script_prompt("Summary text", &[String::from("Point A"), String::from("Point B")])
    );
    assert_eq!(speech.inputs(), vec!["Script body."]);
}

#[tokio::test]
async fn test_key_point_count_matches_non_blank_lines() {
    let model = MockModel::happy("s", "  one \n\n two\n   \nthree\nfour\n\n five  ", "x.");
    let speech = MockSpeech::default();

    let state = pipeline(&model, &speech, PodcastConfig::default())
        .run(document(200))
        .await;

    assert_eq!(state.key_points, vec!["one", "two", "three", "four", "five"]);
}

// ─── Summarize budget ────────────────────────────────────────────────────────

#[tokio::test]
async fn test_nine_thousand_chars_are_summarised_whole() {
    let model = MockModel::happy("s", "p", "x.");
    let speech = MockSpeech::default();
    let source = document(9_000);

    pipeline(&model, &speech, PodcastConfig::default())
        .run(source.clone())
        .await;

    assert_eq!(model.prompts()[0], summarize_prompt(&source));
}

#[tokio::test]
async fn test_long_document_is_cut_at_ten_thousand_chars() {
    let model = MockModel::happy("s", "p", "x.");
    let speech = MockSpeech::default();
    let source = document(12_500);

    pipeline(&model, &speech, PodcastConfig::default())
        .run(source.clone())
        .await;

    let prompt = &model.prompts()[0];
    assert_eq!(*prompt, summarize_prompt(&source[..10_000]));
    assert!(!prompt.contains(&source[..10_001]));
}

// ─── Failure handling ────────────────────────────────────────────────────────

// Running later stages on the empty output of a failed stage is the default
// policy. It produces a podcast from nothing, which may not be what callers
// want; `FailurePolicy::Halt` is the alternative.
#[tokio::test]
async fn test_summarize_failure_continues_with_empty_summary() {
    let model = MockModel::scripted(vec![
        Err("401 Unauthorized"),
        Ok("1. Point"),
        Ok("Script anyway."),
    ]);
    let speech = MockSpeech::default();

    let state = pipeline(&model, &speech, PodcastConfig::default())
        .run(document(400))
        .await;

    assert!(state.summary.is_empty());
    assert_eq!(
        state.error,
        Some(StageError::Summarize("401 Unauthorized".into()))
    );
    assert_eq!(
        state.error_message().as_deref(),
        Some("Summarization error: 401 Unauthorized")
    );

    // Stages 2-4 still ran, on an empty summary.
    assert_eq!(model.prompts().len(), 3);
    assert_eq!(model.prompts()[1], key_points_prompt(""));
    assert_eq!(state.key_points, vec!["1. Point"]);
    assert_eq!(state.script, "Script anyway.");
    assert!(state.final_audio.is_some());
}

#[tokio::test]
async fn test_halt_policy_stops_after_first_failure() {
    let model = MockModel::scripted(vec![Err("timeout"), Ok("unused"), Ok("unused")]);
    let speech = MockSpeech::default();
    let config = PodcastConfig::builder()
        .on_failure(FailurePolicy::Halt)
        .build()
        .unwrap();

    let state = pipeline(&model, &speech, config).run(document(400)).await;

    assert_eq!(model.prompts().len(), 1);
    assert!(speech.inputs().is_empty());
    assert_eq!(state.error.as_ref().map(StageError::stage), Some(Stage::Summarize));
    assert!(state.key_points.is_empty());
    assert!(state.script.is_empty());
    assert!(state.final_audio.is_none());
    assert_eq!(state.current_step, Step::Initialized);
}

#[tokio::test]
async fn test_latest_failure_overwrites_earlier_one() {
    let model = MockModel::scripted(vec![Err("first"), Ok("p"), Ok("A script.")]);
    let speech = MockSpeech::failing_on(1, "quota exceeded");

    let state = pipeline(&model, &speech, PodcastConfig::default())
        .run(document(400))
        .await;

    assert_eq!(
        state.error_message().as_deref(),
        Some("Audio generation error: API error: 500 - quota exceeded")
    );
    assert!(state.final_audio.is_none());
}

#[tokio::test]
async fn test_audio_failure_discards_partial_segments() {
    let script = long_script(120);
    let chunk_count = split_script(&script, 4000).len();
    assert!(chunk_count >= 3);

    let model = MockModel::happy("s", "p", &script);
    let speech = MockSpeech::failing_on(2, "boom");

    let state = pipeline(&model, &speech, PodcastConfig::default())
        .run(document(400))
        .await;

    assert_eq!(speech.inputs().len(), 2);
    assert!(state.audio_segments.is_empty());
    assert!(state.final_audio.is_none());
    assert_eq!(state.script, script);
    assert_eq!(state.current_step, Step::ScriptComplete);
    assert_eq!(state.error.as_ref().map(StageError::stage), Some(Stage::Audio));
}

#[tokio::test]
async fn test_every_stage_failing_still_returns_state() {
    let model = MockModel::scripted(vec![Err("a"), Err("b"), Err("c")]);
    let speech = MockSpeech::failing_on(1, "d");

    let state = pipeline(&model, &speech, PodcastConfig::default())
        .run(document(400))
        .await;

    // The empty script still goes to the speech service once.
    assert_eq!(speech.inputs(), vec![String::new()]);
    assert_eq!(state.error.as_ref().map(StageError::stage), Some(Stage::Audio));
    assert_eq!(state.current_step, Step::Initialized);
}

// ─── Audio assembly ──────────────────────────────────────────────────────────

#[tokio::test]
async fn test_long_script_audio_is_concatenated_in_order() {
    let script = long_script(120);
    let model = MockModel::happy("s", "p", &script);
    let speech = MockSpeech::default();

    let state = pipeline(&model, &speech, PodcastConfig::default())
        .run(document(400))
        .await;

    let inputs = speech.inputs();
    assert!(inputs.len() > 1);
    assert_eq!(inputs, split_script(&script, 4000));
    for input in &inputs {
        assert!(input.chars().count() <= 4000);
    }

    let expected: Vec<u8> = inputs.iter().flat_map(|t| MockSpeech::encode(t)).collect();
    assert_eq!(state.audio_segments.len(), inputs.len());
    assert_eq!(state.final_audio, Some(expected));
}

#[tokio::test]
async fn test_speech_char_limit_is_configurable() {
    let script = "One two. Three four. Five six. Seven eight.";
    let model = MockModel::happy("s", "p", script);
    let speech = MockSpeech::default();
    let config = PodcastConfig::builder()
        .speech_char_limit(20)
        .build()
        .unwrap();

    pipeline(&model, &speech, config).run(document(400)).await;

    assert_eq!(
        speech.inputs(),
        vec!["One two. Three four.", "Five six.", "Seven eight."]
    );
}

// ─── Progress events ─────────────────────────────────────────────────────────

#[derive(Default)]
struct Recorder {
    events: Mutex<Vec<String>>,
}

impl Recorder {
    fn push(&self, e: String) {
        self.events.lock().unwrap().push(e);
    }
}

impl PipelineProgressCallback for Recorder {
    fn on_pipeline_start(&self, source_chars: usize) {
        self.push(format!("begin:{source_chars}"));
    }
    fn on_stage_start(&self, stage: Stage) {
        self.push(format!("start:{stage}"));
    }
    fn on_stage_complete(&self, stage: Stage) {
        self.push(format!("done:{stage}"));
    }
    fn on_stage_error(&self, stage: Stage, error: &str) {
        self.push(format!("error:{stage}:{error}"));
    }
    fn on_segment_complete(&self, segment: usize, total: usize, _bytes: usize) {
        self.push(format!("segment:{segment}/{total}"));
    }
    fn on_pipeline_complete(&self, failed_stages: usize) {
        self.push(format!("end:{failed_stages}"));
    }
}

#[tokio::test]
async fn test_progress_events_follow_stage_order() {
    let recorder = Arc::new(Recorder::default());
    let config = PodcastConfig::builder()
        .progress_callback(recorder.clone())
        .build()
        .unwrap();
    let model = MockModel::scripted(vec![Ok("s"), Err("bad"), Ok("Script.")]);
    let speech = MockSpeech::default();

    pipeline(&model, &speech, config).run(document(150)).await;

    let events = recorder.events.lock().unwrap().clone();
    assert_eq!(
        events,
        vec![
            "begin:150",
            "start:summarize",
            "done:summarize",
            "start:key_points",
            "error:key_points:Key points extraction error: bad",
            "start:script",
            "done:script",
            "start:audio",
            "segment:1/1",
            "done:audio",
            "end:1",
        ]
    );
}

// ─── Sync wrapper ────────────────────────────────────────────────────────────

#[test]
fn test_run_sync_outside_runtime() {
    let model = MockModel::happy("s", "p", "Short script.");
    let speech = MockSpeech::default();

    let state = pipeline(&model, &speech, PodcastConfig::default())
        .run_sync(document(200))
        .unwrap();

    assert_eq!(state.current_step, Step::AudioComplete);
    assert_eq!(state.final_audio, Some(MockSpeech::encode("Short script.")));
}
