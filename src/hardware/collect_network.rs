use crate::hardware::lshw::ComponentRecord;
use crate::hardware::types::NetworkFact;

/// Project network records. Absent fields stay absent here; unlike the other
/// categories no sentinel is substituted.
pub fn collect_network_facts(records: &[ComponentRecord]) -> Vec<NetworkFact> {
    records
        .iter()
        .map(|nic| NetworkFact {
            name: nic.logicalname.clone(),
            mac: nic.serial.clone(),
            product: nic.product.clone(),
            description: nic.description.clone(),
        })
        .collect()
}
