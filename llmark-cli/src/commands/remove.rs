use clap::Args;

use llmark_core::types::BookmarkId;

use super::StoreArgs;

#[derive(Args, Debug)]
pub struct RemoveArgs {
    #[command(flatten)]
    pub store: StoreArgs,

    /// Bookmark id to delete
    pub id: i64,
}

pub async fn run(args: RemoveArgs) -> anyhow::Result<()> {
    let (store, _config) = args.store.open_existing()?;
    let id = BookmarkId(args.id);

    let marks = store.load_all().await;
    let Some(bm) = marks.iter().find(|bm| bm.id == id) else {
        anyhow::bail!("Bookmark not found: {id}");
    };
    let title = bm.title.clone();

    store.delete_one(id).await;
    println!("removed {id}  {title}");

    Ok(())
}
