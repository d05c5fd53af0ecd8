use imgrelay::{HostAllowList, MessageStore, QueryLinkBuilder, batch};

async fn seeded_store() -> (MessageStore, Vec<(i64, String)>) {
    let store = MessageStore::in_memory().await.unwrap();
    let bodies = [
        "Hi, see ![screenshot](https://tracker.example.net/shot.png) attached",
        "Logo here: <img src=\"https://cdn.trusted.com/logo.png\" alt=\"logo\">",
        "plain reply, no images",
        "two: ![a](https://a.example.org/1.png) and <img src='https://b.example.org/2.gif'>",
    ];
    let mut seeded = Vec::new();
    for (n, body) in bodies.iter().enumerate() {
        let ticket_id = i64::try_from(n).unwrap() / 2 + 1;
        let id = store.insert_message(ticket_id, "customer", body).await.unwrap();
        seeded.push((id, (*body).to_string()));
    }
    (store, seeded)
}

fn builder() -> QueryLinkBuilder {
    QueryLinkBuilder::from_base("https://support.example.net").unwrap()
}

async fn migrate(store: &MessageStore, allow: &HostAllowList) -> imgrelay::RewriteStats {
    let messages = store.list_messages().await.unwrap();
    batch::rewrite_all(
        messages.into_iter().map(|m| (m.id, m.content)),
        allow,
        &builder(),
        |id, text| {
            Box::pin(async move { store.update_content(id, &text).await.map_err(Into::into) })
        },
    )
    .await
}

async fn revert(store: &MessageStore) -> imgrelay::RevertStats {
    let messages = store.list_messages().await.unwrap();
    batch::revert_all(
        messages.into_iter().map(|m| (m.id, m.content)),
        &builder(),
        |id, text| {
            Box::pin(async move { store.update_content(id, &text).await.map_err(Into::into) })
        },
    )
    .await
}

#[tokio::test]
async fn migration_rewrites_external_images_in_place() {
    let (store, _) = seeded_store().await;
    let allow = HostAllowList::parse("cdn.trusted.com");

    let stats = migrate(&store, &allow).await;
    assert_eq!(stats.processed, 4);
    assert_eq!(stats.updated, 2);
    assert_eq!(stats.images_found, 4);

    let messages = store.list_messages().await.unwrap();
    assert!(messages[0].content.contains("/imageproxy/image?u="));
    assert!(!messages[0].content.contains("https://tracker.example.net/shot.png"));
    // Allow-listed host stays direct.
    assert!(messages[1].content.contains("https://cdn.trusted.com/logo.png"));
    assert_eq!(messages[2].content, "plain reply, no images");
    // Both dialects rewritten within one message.
    assert_eq!(messages[3].content.matches("/imageproxy/image?u=").count(), 2);
}

#[tokio::test]
async fn migration_is_idempotent_across_runs() {
    let (store, _) = seeded_store().await;
    let allow = HostAllowList::parse("cdn.trusted.com");

    migrate(&store, &allow).await;
    let after_first = store.list_messages().await.unwrap();

    let stats = migrate(&store, &allow).await;
    assert_eq!(stats.updated, 0);
    assert_eq!(store.list_messages().await.unwrap(), after_first);
}

#[tokio::test]
async fn reversion_restores_original_bodies() {
    let (store, seeded) = seeded_store().await;
    let allow = HostAllowList::parse("");

    migrate(&store, &allow).await;
    let stats = revert(&store).await;
    assert_eq!(stats.processed, 4);
    assert_eq!(stats.reverted, 3);

    let messages = store.list_messages().await.unwrap();
    for (id, original) in seeded {
        let message = messages.iter().find(|m| m.id == id).unwrap();
        assert_eq!(message.content, original);
    }
}

#[tokio::test]
async fn reverting_an_unmigrated_store_changes_nothing() {
    let (store, seeded) = seeded_store().await;
    let stats = revert(&store).await;
    assert_eq!(stats.reverted, 0);

    let messages = store.list_messages().await.unwrap();
    for (id, original) in seeded {
        assert_eq!(messages.iter().find(|m| m.id == id).unwrap().content, original);
    }
}
