use crate::output::print_json;
use slot_core::Store;

pub fn run(store: &Store, name: &str, json: bool) -> anyhow::Result<()> {
    let mut slots = super::load(store)?;
    if !slots.delete(name) {
        // Nothing is written, so the store file stays untouched.
        return Err(super::not_found(&slots, name).into());
    }
    super::save(store, &slots)?;
    tracing::info!(name, remaining = slots.len(), "removed slot");

    if json {
        print_json(&serde_json::json!({ "name": name, "removed": true }))?;
    } else {
        println!("removed {name}");
    }
    Ok(())
}
