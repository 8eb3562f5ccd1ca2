use splitledger::domain::group::{Currency, Group, GroupDraft};
use splitledger::domain::ids::{GroupId, MemberId};
use splitledger::domain::ports::{DirectoryBox, GroupStoreBox};
use splitledger::infrastructure::in_memory::{InMemoryDirectory, InMemoryGroupStore};

#[tokio::test]
async fn test_ports_as_trait_objects() {
    let store: GroupStoreBox = Box::new(InMemoryGroupStore::new());
    let directory: DirectoryBox =
        Box::new(InMemoryDirectory::from_entries([(MemberId(1), "alice")]));

    let group = Group::new(
        GroupId(1),
        GroupDraft {
            name: "Trip".to_string(),
            currency: Currency::Usd,
            members: vec![MemberId(1)],
        },
    );

    // Verify Send + Sync by spawning tasks
    let store_handle = tokio::spawn(async move {
        store.store(group).await.unwrap();
        store.get(GroupId(1)).await.unwrap().unwrap()
    });

    let directory_handle =
        tokio::spawn(async move { directory.lookup(&[MemberId(1), MemberId(2)]).await.unwrap() });

    let retrieved = store_handle.await.unwrap();
    assert_eq!(retrieved.name, "Trip");

    let entries = directory_handle.await.unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].name, "alice");
}
