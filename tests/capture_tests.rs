use fluency_coach::audio::wav;
use fluency_coach::{CaptureBackend, CaptureConfig, CoachError, ScriptedBackend};

#[tokio::test]
async fn scripted_backend_delivers_fragments_in_order() {
    let mut backend = ScriptedBackend::new(vec![vec![1; 4], vec![2; 4], vec![3; 4]]);
    backend.open().await.unwrap();

    let mut rx = backend.start().await.unwrap();
    assert!(backend.is_capturing());

    assert_eq!(rx.recv().await.unwrap(), vec![1; 4]);
    assert_eq!(rx.recv().await.unwrap(), vec![2; 4]);
    assert_eq!(rx.recv().await.unwrap(), vec![3; 4]);

    backend.stop().await.unwrap();
    assert!(rx.recv().await.is_none());
    assert!(!backend.is_capturing());
}

#[tokio::test]
async fn scripted_backend_skips_empty_fragments() {
    let mut backend = ScriptedBackend::new(vec![Vec::new(), vec![9; 2], Vec::new()]);

    let mut rx = backend.start().await.unwrap();
    backend.stop().await.unwrap();

    assert_eq!(rx.recv().await.unwrap(), vec![9; 2]);
    assert!(rx.recv().await.is_none());
}

#[tokio::test]
async fn scripted_backend_stop_is_idempotent() {
    let mut backend = ScriptedBackend::new(vec![vec![1; 4]]);
    let _rx = backend.start().await.unwrap();

    backend.stop().await.unwrap();
    backend.stop().await.unwrap();
    assert!(!backend.is_capturing());
}

#[tokio::test]
async fn scripted_backend_can_deny_permission() {
    let mut backend = ScriptedBackend::new(Vec::new()).deny_permission();
    assert!(matches!(
        backend.open().await.unwrap_err(),
        CoachError::PermissionDenied(_)
    ));
}

#[test]
fn wrapped_pcm_reads_back_with_hound() {
    let samples: Vec<i16> = vec![0, 1000, -1000, 32767, -32768];
    let pcm: Vec<u8> = samples.iter().flat_map(|s| s.to_le_bytes()).collect();
    let config = CaptureConfig::default();

    let wav = wav::wrap_pcm(&pcm, config.sample_rate, config.channels).unwrap();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("capture.wav");
    std::fs::write(&path, &wav).unwrap();

    let mut reader = hound::WavReader::open(&path).unwrap();
    let spec = reader.spec();
    assert_eq!(spec.sample_rate, config.sample_rate);
    assert_eq!(spec.channels, config.channels);
    assert_eq!(spec.bits_per_sample, 16);

    let read: Vec<i16> = reader.samples::<i16>().map(|s| s.unwrap()).collect();
    assert_eq!(read, samples);
}

#[test]
fn wrapped_pcm_ignores_odd_trailing_byte() {
    let pcm = vec![0u8, 1, 2];
    let wav = wav::wrap_pcm(&pcm, 16_000, 1).unwrap();

    let mut reader = hound::WavReader::new(std::io::Cursor::new(wav)).unwrap();
    assert_eq!(reader.samples::<i16>().count(), 1);
}
