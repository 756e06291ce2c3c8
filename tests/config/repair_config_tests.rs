use it_assets::config::RepairConfig;

#[test]
fn default_offset_is_utc_plus_eight() {
    let offset = RepairConfig::default()
        .business_offset()
        .expect("valid offset");
    assert_eq!(offset.local_minus_utc(), 8 * 3600);
}

#[test]
fn out_of_range_offset_is_rejected() {
    let config = RepairConfig {
        utc_offset_minutes: 24 * 60,
        max_allocation_attempts: 5,
    };
    assert!(config.business_offset().is_none());
    assert!(config.validate().is_err());
}

#[test]
fn zero_attempts_is_rejected() {
    let config = RepairConfig {
        utc_offset_minutes: 0,
        max_allocation_attempts: 0,
    };
    assert!(config.validate().is_err());
}
