use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        CueError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(CueError::xml("x").to_string().contains("xml error:"));
    assert!(
        CueError::property("x")
            .to_string()
            .contains("property error:")
    );
    assert!(
        CueError::serde("x")
            .to_string()
            .contains("serialization error:")
    );
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = CueError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}
