use anyhow::Context;
use slot_core::render::{self, Bindings};
use slot_core::Store;

pub fn run(
    store: &Store,
    name: &str,
    positional: &[String],
    with: &[String],
    cli_args: &[String],
) -> anyhow::Result<()> {
    let slots = super::load(store)?;
    let Some(slot) = slots.get(name) else {
        return Err(super::not_found(&slots, name).into());
    };

    let user = Bindings::parse(positional.iter().chain(with))?;
    let bindings = render::render_bindings(store.path(), cli_args, user);
    tracing::debug!(
        slot = name,
        keys = ?bindings.keys().collect::<Vec<_>>(),
        "rendering slot"
    );

    let rendered = render::apply(&slot.cmd, &bindings)
        .with_context(|| format!("cannot render slot \"{name}\""))?;
    println!("{rendered}");
    Ok(())
}
