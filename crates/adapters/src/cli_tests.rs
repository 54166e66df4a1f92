use super::*;

#[test]
fn build_args_includes_resume_flag_when_session_ref_present() {
    let mut config = ProviderConfig::new(
        ProcessId::coordinator(),
        ProviderKind::ClaudeCode,
        std::path::PathBuf::from("/tmp"),
        "hello",
    );
    config = config.resume_session_ref("sess-1");
    let args = build_args(&config);
    assert!(args.contains(&"--resume".to_string()));
    assert!(args.contains(&"sess-1".to_string()));
}

#[test]
fn build_args_omits_resume_flag_by_default() {
    let config = ProviderConfig::new(
        ProcessId::coordinator(),
        ProviderKind::ClaudeCode,
        std::path::PathBuf::from("/tmp"),
        "hello",
    );
    assert!(!build_args(&config).contains(&"--resume".to_string()));
}
