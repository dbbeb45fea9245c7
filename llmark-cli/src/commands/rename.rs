use clap::Args;

use llmark_core::types::BookmarkId;

use super::StoreArgs;

#[derive(Args, Debug)]
pub struct RenameArgs {
    #[command(flatten)]
    pub store: StoreArgs,

    /// Bookmark id to rename
    pub id: i64,

    /// New title (capped at the configured title length)
    pub title: String,
}

pub async fn run(args: RenameArgs) -> anyhow::Result<()> {
    let (store, _config) = args.store.open_existing()?;
    let id = BookmarkId(args.id);

    let marks = store.load_all().await;
    if !marks.iter().any(|bm| bm.id == id) {
        anyhow::bail!("Bookmark not found: {id}");
    }

    store.save_title(id, &args.title).await;
    println!("renamed {id}");

    Ok(())
}
