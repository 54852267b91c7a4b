use crate::output::print_json;
use slot_core::slot::{self as slot_ops, Slot};
use slot_core::{SlotError, Store};

pub struct SaveArgs {
    pub name: String,
    pub command: String,
    pub tags: Vec<String>,
    pub description: Option<String>,
    pub force: bool,
}

pub fn run(store: &Store, args: SaveArgs, json: bool) -> anyhow::Result<()> {
    slot_ops::validate_name(&args.name)?;

    let mut slots = super::load(store)?;
    if slots.exists(&args.name) && !args.force {
        return Err(SlotError::Exists(args.name).into());
    }

    let mut slot = Slot::new(args.name.as_str(), args.command).with_tags(args.tags);
    if let Some(description) = args.description {
        slot = slot.with_description(description);
    }

    let replaced = slots.upsert(slot);
    super::save(store, &slots)?;
    tracing::info!(name = %args.name, replaced, "saved slot");

    if json {
        print_json(&serde_json::json!({
            "name": args.name,
            "replaced": replaced,
            "file": store.path(),
        }))?;
    } else {
        println!("saved {}", args.name);
    }
    Ok(())
}
