use fluency_coach::{
    AssessmentContext, AssessmentKind, CoachError, RecordingContext, RecordingSession,
    SessionStatus,
};

fn quick_context() -> RecordingContext {
    RecordingContext::Assessment(AssessmentContext::new(AssessmentKind::Quick, None).unwrap())
}

#[test]
fn arm_bumps_generation_and_clears_fragments() {
    let mut session = RecordingSession::new();

    let first = session.arm(quick_context()).unwrap();
    session.append_fragment(vec![1; 8]).unwrap();
    session.reset();

    let second = session.arm(quick_context()).unwrap();
    assert!(second > first);
    assert_eq!(session.fragment_count(), 0);
    assert_eq!(session.status(), SessionStatus::Armed);
}

#[test]
fn finalize_concatenates_fragments_in_order() {
    let mut session = RecordingSession::new();
    session.arm(quick_context()).unwrap();

    session.append_fragment(vec![1; 10]).unwrap();
    session.append_fragment(Vec::new()).unwrap();
    session.append_fragment(vec![2; 20]).unwrap();
    assert_eq!(session.fragment_count(), 2);

    let capture = session.finalize().unwrap();
    assert_eq!(capture.blob.len(), 30);
    assert_eq!(&capture.blob[..10], &[1; 10]);
    assert_eq!(&capture.blob[10..], &[2; 20]);
    assert_eq!(session.status(), SessionStatus::Idle);
}

#[test]
fn finalize_without_audio_fails_and_returns_idle() {
    let mut session = RecordingSession::new();
    session.arm(quick_context()).unwrap();

    let err = session.finalize().unwrap_err();
    assert!(matches!(err, CoachError::NoAudioCaptured));
    assert_eq!(session.status(), SessionStatus::Idle);

    // The machine stays reusable after the failure.
    assert!(session.arm(quick_context()).is_ok());
}

#[test]
fn second_arm_rejected_without_side_effects() {
    let mut session = RecordingSession::new();
    session.arm(quick_context()).unwrap();
    session.append_fragment(vec![3; 4]).unwrap();
    let generation = session.generation();

    let err = session.arm(RecordingContext::Practice).unwrap_err();
    assert!(matches!(err, CoachError::AlreadyArmed));
    assert_eq!(session.generation(), generation);
    assert_eq!(session.fragment_count(), 1);
    assert_eq!(session.status(), SessionStatus::Armed);

    // The original context survives the rejected arm.
    let capture = session.finalize().unwrap();
    assert!(matches!(capture.context, RecordingContext::Assessment(_)));
}

#[test]
fn reset_while_armed_discards_everything() {
    let mut session = RecordingSession::new();
    session.arm(RecordingContext::Practice).unwrap();
    session.append_fragment(vec![1; 16]).unwrap();
    session.append_fragment(vec![2; 16]).unwrap();

    session.reset();
    assert_eq!(session.status(), SessionStatus::Idle);
    assert_eq!(session.fragment_count(), 0);

    // No capture is produced for the discarded audio.
    assert!(matches!(
        session.finalize().unwrap_err(),
        CoachError::NotArmed
    ));
}

#[test]
fn append_outside_armed_is_rejected() {
    let mut session = RecordingSession::new();
    assert!(matches!(
        session.append_fragment(vec![1]).unwrap_err(),
        CoachError::NotArmed
    ));
}

#[test]
fn capture_carries_arm_time_context_and_generation() {
    let mut session = RecordingSession::new();
    let generation = session.arm(RecordingContext::Practice).unwrap();
    session.append_fragment(vec![9; 12]).unwrap();

    let capture = session.finalize().unwrap();
    assert_eq!(capture.generation, generation);
    assert_eq!(capture.context, RecordingContext::Practice);
}

#[test]
fn elapsed_only_reported_while_armed() {
    let mut session = RecordingSession::new();
    assert!(session.elapsed().is_none());

    session.arm(quick_context()).unwrap();
    assert!(session.elapsed().is_some());

    session.reset();
    assert!(session.elapsed().is_none());
}
