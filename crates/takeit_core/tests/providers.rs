use std::sync::Arc;
use takeit_core::{
    providers, EventId, EventsProvider, ItemsProvider, KeyValueStore, ListStorage, MemoryKvStore,
    StorageError, ITEMS_STORAGE_KEY,
};

struct Fixture {
    storage: Arc<ListStorage<MemoryKvStore>>,
    items: ItemsProvider<MemoryKvStore>,
    events: EventsProvider<MemoryKvStore>,
}

async fn fixture() -> Fixture {
    let storage = Arc::new(ListStorage::new(MemoryKvStore::new()));
    let (items, events) = providers(Arc::clone(&storage));
    items.load_all().await.unwrap();
    events.load_all().await.unwrap();
    Fixture {
        storage,
        items,
        events,
    }
}

#[tokio::test]
async fn providers_start_unloaded_until_load_all() {
    let storage = Arc::new(ListStorage::new(MemoryKvStore::new()));
    storage.add_items(&["Preexisting"]).await.unwrap();
    let (items, events) = providers(Arc::clone(&storage));

    assert!(!items.is_loaded().await);
    assert!(!events.is_loaded().await);
    assert!(items.snapshot().await.is_empty());

    items.load_all().await.unwrap();
    assert!(items.is_loaded().await);
    assert_eq!(items.snapshot().await[0].text, "Preexisting");
}

#[tokio::test]
async fn mutations_resynchronize_the_cache() {
    let fx = fixture().await;

    let created = fx.items.add_items(&["Milk", "Bread"]).await.unwrap();
    assert_eq!(fx.items.snapshot().await, created);

    let event = fx.events.add_event("Groceries").await.unwrap().unwrap();
    let ids: Vec<_> = created.iter().map(|item| item.id.clone()).collect();
    fx.events
        .attach_items(&ids, &[event.id.clone()])
        .await
        .unwrap();
    fx.events.check_items(&ids[..1], &event.id).await.unwrap();

    let cached = fx.events.get_by_ids(&[event.id.clone()]).await;
    assert_eq!(cached[0].checked_item_ids(), vec![ids[0].clone()]);
    assert_eq!(fx.events.snapshot().await, fx.storage.get_all_events().await.unwrap());

    fx.events.uncheck_items(&ids[..1], &event.id).await.unwrap();
    fx.events.detach_items(&ids[1..], &event.id).await.unwrap();
    let cached = fx.events.snapshot().await;
    assert_eq!(cached[0].item_ids(), vec![ids[0].clone()]);
    assert!(cached[0].checked_item_ids().is_empty());

    fx.events.delete_events(&[event.id.clone()]).await.unwrap();
    assert!(fx.events.snapshot().await.is_empty());
    assert_eq!(fx.items.snapshot().await.len(), 2);
}

#[tokio::test]
async fn get_by_ids_reads_cache_not_storage() {
    let fx = fixture().await;
    let created = fx.items.add_items(&["Cached"]).await.unwrap();

    fx.storage
        .store()
        .set(ITEMS_STORAGE_KEY, "[]".to_string())
        .await
        .unwrap();

    let found = fx.items.get_by_ids(&[created[0].id.clone()]).await;
    assert_eq!(found, created);

    fx.items.load_all().await.unwrap();
    assert!(fx.items.get_by_ids(&[created[0].id.clone()]).await.is_empty());
}

#[tokio::test]
async fn delete_items_cascade_is_visible_through_events_provider() {
    let fx = fixture().await;
    let created = fx.items.add_items(&["Gone", "Stays"]).await.unwrap();
    let event = fx.events.add_event("Trip").await.unwrap().unwrap();
    let ids: Vec<_> = created.iter().map(|item| item.id.clone()).collect();
    fx.events
        .attach_items(&ids, &[event.id.clone()])
        .await
        .unwrap();

    fx.items.delete_items(&ids[..1]).await.unwrap();

    assert!(fx.items.get_by_ids(&ids[..1]).await.is_empty());
    let cached = fx.events.get_by_ids(&[event.id.clone()]).await;
    assert_eq!(cached[0].item_ids(), ids[1..].to_vec());
    assert_eq!(fx.events.snapshot().await, fx.storage.get_all_events().await.unwrap());
}

#[tokio::test]
async fn not_found_propagates_and_cache_keeps_last_state() {
    let fx = fixture().await;
    fx.events.add_event("Real").await.unwrap();
    let before = fx.events.snapshot().await;
    let item = fx.items.add_item("Thing").await.unwrap().unwrap();

    let err = fx
        .events
        .check_items(&[item.id.clone()], &EventId::from("nonexistent-event-id"))
        .await
        .unwrap_err();
    assert!(matches!(err, StorageError::EventNotFound(_)));
    assert_eq!(fx.events.snapshot().await, before);
}

#[tokio::test]
async fn clear_wrappers_empty_caches() {
    let fx = fixture().await;
    fx.items.add_item("A").await.unwrap();
    fx.events.add_event("B").await.unwrap();

    fx.items.clear_items().await.unwrap();
    fx.events.clear_events().await.unwrap();

    assert!(fx.items.snapshot().await.is_empty());
    assert!(fx.events.snapshot().await.is_empty());
}
