//! ---
//! engage_section: "01-descriptor-model"
//! engage_subsection: "catalog"
//! engage_type: "source"
//! engage_scope: "code"
//! engage_description: "Services discovered by the host platform."
//! engage_version: "v0.0.0-prealpha"
//! engage_owner: "tbd"
//! ---

use crate::catalog::group::NetworkAddress;
use crate::wire_descriptor;

/// A service found by the host platform's own discovery and reported to the
/// engine.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlatformDiscoveredService {
    pub id: String,
    pub kind: String,
    pub name: String,
    pub address: NetworkAddress,
}

wire_descriptor! {
    PlatformDiscoveredService => "PlatformDiscoveredService" {
        id: "id" [optional],
        kind: "type" [optional],
        name: "name" [optional],
        address: "address" [optional],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::Descriptor;
    use serde_json::json;

    #[test]
    fn partial_address_falls_back_to_default() {
        let service = PlatformDiscoveredService::decode(&json!({
            "id": "svc-1",
            "type": "trellisware",
            "address": { "address": "10.1.1.1" }
        }))
        .unwrap();
        assert_eq!(service.kind, "trellisware");
        assert_eq!(service.address, NetworkAddress::default());
    }
}
