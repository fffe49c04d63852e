#![cfg(feature = "serde")]

use fleetsched::{DispatchPolicyKind, GlobalSchedulerConfig, InstanceInfo};

#[test]
fn config_round_trips_through_json() {
    let config = GlobalSchedulerConfig {
        dispatch_policy: DispatchPolicyKind::Loadv2,
        ..GlobalSchedulerConfig::default()
    };
    let json = serde_json::to_string(&config).unwrap();
    let restored: GlobalSchedulerConfig = serde_json::from_str(&json).unwrap();
    assert_eq!(config, restored);
}

#[test]
fn instance_info_round_trips_through_json() {
    let info = InstanceInfo::placeholder("a");
    let json = serde_json::to_string(&info).unwrap();
    let restored: InstanceInfo = serde_json::from_str(&json).unwrap();
    assert_eq!(info, restored);
}
