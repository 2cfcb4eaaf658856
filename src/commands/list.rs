use crate::core::registry::{all_software, SoftwareStatus};

pub fn list_families() {
    println!("Server software:");
    println!();

    for (family, status) in all_software() {
        match status {
            SoftwareStatus::Active => println!("  {family}"),
            SoftwareStatus::Disabled { reason } => println!("  {family} (disabled: {reason})"),
            SoftwareStatus::Unknown => {}
        }
    }

    println!();
    println!("List versions: mcserver versions <software>");
}
