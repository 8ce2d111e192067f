use std::path::PathBuf;

use revocal::domain::transcript::{clean_text, distinguishing_words, tokenize};
use revocal::domain::{
    content_hash, FingerprintInputs, JobStatus, MediaKind, PipelineRun, RunId, RunParams,
    RunState, SourceMedia, SubstitutionRule, WorkPath,
};

fn audio_run() -> PipelineRun {
    PipelineRun::new(
        SourceMedia::new(PathBuf::from("input.wav"), MediaKind::Audio),
        RunParams {
            language: "en".into(),
            transcription_model: "whisper-small".into(),
            punctuation_model: "fullstop-punctuation".into(),
        },
    )
}

#[test]
fn given_punctuated_text_when_cleaning_then_only_words_and_spaces_remain() {
    assert_eq!(clean_text("hey, Nick! how's it going?"), "hey Nick hows it going");
}

#[test]
fn given_transcript_when_tokenizing_then_order_is_preserved() {
    assert_eq!(
        tokenize("hey nick, how are you?"),
        vec!["hey", "nick", "how", "are", "you"]
    );
}

#[test]
fn given_variant_with_one_substitution_when_diffing_then_new_word_is_found() {
    let words = distinguishing_words("hey nick how are you", "hey alex how are you");
    assert_eq!(words, vec!["alex"]);
}

#[test]
fn given_repeated_new_words_when_diffing_then_result_is_deduped_in_order() {
    let words = distinguishing_words("a b c", "x a y x b");
    assert_eq!(words, vec!["x", "y"]);
}

#[test]
fn given_identical_texts_when_diffing_then_no_words_remain() {
    assert!(distinguishing_words("same words here", "same words here").is_empty());
}

#[test]
fn given_file_extensions_when_classifying_then_kind_matches() {
    assert_eq!(
        MediaKind::from_extension(std::path::Path::new("clip.mp4")),
        Some(MediaKind::Video)
    );
    assert_eq!(
        MediaKind::from_extension(std::path::Path::new("voice.WAV")),
        Some(MediaKind::Audio)
    );
    assert_eq!(MediaKind::from_extension(std::path::Path::new("notes.txt")), None);
}

#[test]
fn given_new_run_when_walking_happy_path_then_all_transitions_are_legal() {
    let mut run = audio_run();
    assert_eq!(run.state, RunState::Created);

    for next in [
        RunState::Transcribing,
        RunState::AwaitingSubstitutionInput,
        RunState::GeneratingVariants,
        RunState::Synthesizing,
        RunState::Assembling,
        RunState::Complete,
    ] {
        run.transition_to(next).unwrap();
    }
    assert!(run.state.is_terminal());
}

#[test]
fn given_audio_run_when_transitioning_to_extracting_then_transition_is_rejected() {
    // Extraction is a video stage; the state machine still rejects skips
    // in the wrong direction for every run.
    let mut run = audio_run();
    run.transition_to(RunState::Transcribing).unwrap();
    assert!(run.transition_to(RunState::Synthesizing).is_err());
    assert!(run.transition_to(RunState::Created).is_err());
}

#[test]
fn given_any_active_state_when_failing_then_transition_is_legal() {
    for state in [
        RunState::Created,
        RunState::Extracting,
        RunState::Transcribing,
        RunState::AwaitingSubstitutionInput,
        RunState::GeneratingVariants,
        RunState::Synthesizing,
        RunState::Assembling,
    ] {
        assert!(state.can_transition_to(RunState::Failed));
        assert!(state.can_transition_to(RunState::Cancelled));
    }
}

#[test]
fn given_terminal_state_when_transitioning_then_everything_is_rejected() {
    for state in [RunState::Complete, RunState::Failed, RunState::Cancelled] {
        assert!(!state.can_transition_to(RunState::Failed));
        assert!(!state.can_transition_to(RunState::Transcribing));
    }
}

#[test]
fn given_same_inputs_when_fingerprinting_then_hashes_are_equal() {
    let rules = vec![SubstitutionRule::new("nick", vec!["alex".into()])];
    let a = fingerprint_with(&rules, 90);
    let b = fingerprint_with(&rules, 90);
    assert_eq!(a, b);
}

#[test]
fn given_different_threshold_when_fingerprinting_then_hashes_differ() {
    let rules = vec![SubstitutionRule::new("nick", vec!["alex".into()])];
    assert_ne!(fingerprint_with(&rules, 90), fingerprint_with(&rules, 80));
}

#[test]
fn given_reordered_rules_when_fingerprinting_then_hashes_differ() {
    // First-match substitution makes rule order part of the run identity.
    let ab = vec![
        SubstitutionRule::new("nick", vec!["alex".into()]),
        SubstitutionRule::new("brother", vec!["sister".into()]),
    ];
    let ba = vec![ab[1].clone(), ab[0].clone()];
    assert_ne!(fingerprint_with(&ab, 90), fingerprint_with(&ba, 90));
}

fn fingerprint_with(rules: &[SubstitutionRule], threshold: u8) -> revocal::domain::RunFingerprint {
    let hash = content_hash(b"source media bytes");
    FingerprintInputs {
        source_content_hash: &hash,
        language: "en",
        transcription_model: "whisper-small",
        punctuation_model: "fullstop-punctuation",
        threshold,
        rules,
    }
    .fingerprint()
}

#[test]
fn given_run_id_and_filename_when_building_work_path_then_format_is_id_slash_filename() {
    let run_id = RunId::new();
    let path = WorkPath::new(&run_id, "transcript.txt");
    assert_eq!(path.as_str(), format!("{}/transcript.txt", run_id.as_uuid()));
    assert_eq!(path.filename(), "transcript.txt");
}

#[test]
fn given_job_status_when_round_tripping_through_str_then_value_is_preserved() {
    for status in [
        JobStatus::Pending,
        JobStatus::Running,
        JobStatus::Succeeded,
        JobStatus::Failed,
        JobStatus::Cancelled,
    ] {
        let parsed: JobStatus = status.as_str().parse().unwrap();
        assert_eq!(parsed, status);
    }
    assert!("BOGUS".parse::<JobStatus>().is_err());
}

#[test]
fn given_jobs_out_of_completion_order_when_listing_artifacts_then_variant_order_wins() {
    let mut run = audio_run();
    let mut job2 = revocal::domain::SynthesisJob::new(2);
    job2.artifact = Some(WorkPath::new(&run.id, "second.wav"));
    let mut job0 = revocal::domain::SynthesisJob::new(0);
    job0.artifact = Some(WorkPath::new(&run.id, "first.wav"));
    run.jobs = vec![job2, job0];

    let names: Vec<&str> = run.artifacts().iter().map(|p| p.filename()).collect();
    assert_eq!(names, vec!["first.wav", "second.wav"]);
}
