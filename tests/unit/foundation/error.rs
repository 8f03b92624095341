use super::*;

#[test]
fn display_strings_are_stable() {
    assert_eq!(
        DriftError::validation("display_secs out of range").to_string(),
        "validation error: display_secs out of range"
    );
    assert_eq!(
        DriftError::decode("bad jpeg marker").to_string(),
        "decode error: bad jpeg marker"
    );
    assert_eq!(
        DriftError::unsupported_format(".xcf").to_string(),
        "unsupported format: .xcf"
    );
    assert_eq!(
        DriftError::EmptyPlaylist.to_string(),
        "playlist contains no images"
    );
    assert_eq!(
        DriftError::resource_exhausted("decode pool").to_string(),
        "resource exhausted: decode pool"
    );
}

#[test]
fn per_image_classification_drives_skipping() {
    assert!(DriftError::decode("x").is_per_image());
    assert!(DriftError::unsupported_format("x").is_per_image());

    assert!(!DriftError::validation("x").is_per_image());
    assert!(!DriftError::EmptyPlaylist.is_per_image());
    assert!(!DriftError::resource_exhausted("x").is_per_image());
    assert!(!DriftError::from(anyhow::anyhow!("io")).is_per_image());
}

#[test]
fn anyhow_errors_pass_through_transparently() {
    let err: DriftError = anyhow::anyhow!("underlying io failure").into();
    assert_eq!(err.to_string(), "underlying io failure");
    assert!(matches!(err, DriftError::Other(_)));
}

#[test]
fn question_mark_converts_in_drift_result_context() {
    fn read() -> DriftResult<u32> {
        let v: u32 = "17".parse().map_err(anyhow::Error::from)?;
        Ok(v)
    }
    assert_eq!(read().unwrap(), 17);
}
