use crate::output::print_json;
use slot_core::Store;

pub fn run(store: &Store, json: bool) -> anyhow::Result<()> {
    if json {
        print_json(&serde_json::json!({
            "file": store.path(),
            "exists": store.path().exists(),
        }))?;
    } else {
        println!("{}", store.path().display());
    }
    Ok(())
}
