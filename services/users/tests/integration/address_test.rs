use mall_domain::id::{AddressId, UserId};
use mall_users::domain::types::AddressStatus;
use mall_users::domain::repository::AddressRepository;
use mall_users::error::UsersServiceError;
use mall_users::usecase::address::{
    CreateAddressUseCase, DeleteAddressUseCase, ListAddressesUseCase, RenameAddressUseCase,
    SetDefaultAddressUseCase, UpdateAddressUseCase,
};

use crate::helpers::{TestDb, address_fields};

const LIMIT: u64 = 20;

async fn create(db: &TestDb, user_id: UserId, title: &str) -> Result<AddressId, UsersServiceError> {
    let usecase = CreateAddressUseCase {
        repo: db.address_repo(),
    };
    let address = usecase
        .execute(user_id, address_fields(title), LIMIT)
        .await?;
    Ok(address.id)
}

// ── CreateAddressUseCase ─────────────────────────────────────────────────────

#[tokio::test]
async fn should_reject_address_beyond_limit_without_writing() {
    let db = TestDb::new();
    let alice = db.seed_user(1, "alice_01");

    for i in 0..LIMIT {
        create(&db, alice, &format!("Address {i}")).await.unwrap();
    }
    assert_eq!(db.active_count(alice), 20);

    let result = create(&db, alice, "One too many").await;
    assert!(
        matches!(result, Err(UsersServiceError::AddressLimitExceeded)),
        "expected AddressLimitExceeded, got {result:?}"
    );
    assert_eq!(db.active_count(alice), 20);
    assert_eq!(db.tables.lock().unwrap().addresses.len(), 20);
}

#[tokio::test]
async fn should_free_a_slot_after_soft_delete() {
    let db = TestDb::new();
    let alice = db.seed_user(1, "alice_01");
    let mut ids = vec![];
    for i in 0..LIMIT {
        ids.push(create(&db, alice, &format!("Address {i}")).await.unwrap());
    }

    let delete = DeleteAddressUseCase {
        repo: db.address_repo(),
    };
    delete.execute(alice, ids[3]).await.unwrap();

    create(&db, alice, "Replacement").await.unwrap();
    assert_eq!(db.active_count(alice), 20);
}

#[tokio::test]
async fn should_count_limit_per_user() {
    let db = TestDb::new();
    let alice = db.seed_user(1, "alice_01");
    let bob = db.seed_user(2, "bob_0001");
    for i in 0..LIMIT {
        create(&db, alice, &format!("Address {i}")).await.unwrap();
    }
    create(&db, bob, "Home").await.unwrap();
}

#[tokio::test]
async fn should_never_exceed_limit_under_concurrent_creates() {
    let db = TestDb::new();
    let alice = db.seed_user(1, "alice_01");

    let mut handles = vec![];
    for i in 0..30 {
        let db = db.clone();
        handles.push(tokio::spawn(async move {
            create(&db, alice, &format!("Address {i}")).await
        }));
    }
    let mut created = 0;
    for handle in handles {
        if handle.await.unwrap().is_ok() {
            created += 1;
        }
    }
    assert_eq!(created, 20);
    assert_eq!(db.active_count(alice), 20);
}

// ── ListAddressesUseCase / DeleteAddressUseCase ──────────────────────────────

#[tokio::test]
async fn should_hide_soft_deleted_address_but_keep_row() {
    let db = TestDb::new();
    let alice = db.seed_user(1, "alice_01");
    let home = create(&db, alice, "Home").await.unwrap();
    let work = create(&db, alice, "Work").await.unwrap();

    let delete = DeleteAddressUseCase {
        repo: db.address_repo(),
    };
    delete.execute(alice, home).await.unwrap();

    let list = ListAddressesUseCase {
        users: db.user_repo(),
        addresses: db.address_repo(),
    };
    let book = list.execute(alice, LIMIT).await.unwrap();
    let ids: Vec<AddressId> = book.addresses.iter().map(|a| a.id).collect();
    assert_eq!(ids, vec![work]);
    assert_eq!(book.limit, 20);

    let stored = db.address_repo().find_by_id(home).await.unwrap().unwrap();
    assert_eq!(stored.status, AddressStatus::Deleted);
}

#[tokio::test]
async fn should_clear_default_when_default_address_deleted() {
    let db = TestDb::new();
    let alice = db.seed_user(1, "alice_01");
    let home = create(&db, alice, "Home").await.unwrap();

    SetDefaultAddressUseCase {
        repo: db.address_repo(),
    }
    .execute(alice, home)
    .await
    .unwrap();
    assert_eq!(db.user(alice).default_address_id, Some(home));

    DeleteAddressUseCase {
        repo: db.address_repo(),
    }
    .execute(alice, home)
    .await
    .unwrap();
    assert_eq!(db.user(alice).default_address_id, None);
}

#[tokio::test]
async fn should_not_delete_twice() {
    let db = TestDb::new();
    let alice = db.seed_user(1, "alice_01");
    let home = create(&db, alice, "Home").await.unwrap();
    let delete = DeleteAddressUseCase {
        repo: db.address_repo(),
    };
    delete.execute(alice, home).await.unwrap();

    let result = delete.execute(alice, home).await;
    assert!(matches!(result, Err(UsersServiceError::AddressNotFound)));
}

#[tokio::test]
async fn should_report_default_in_address_book() {
    let db = TestDb::new();
    let alice = db.seed_user(1, "alice_01");
    create(&db, alice, "Home").await.unwrap();
    let work = create(&db, alice, "Work").await.unwrap();
    SetDefaultAddressUseCase {
        repo: db.address_repo(),
    }
    .execute(alice, work)
    .await
    .unwrap();

    let book = ListAddressesUseCase {
        users: db.user_repo(),
        addresses: db.address_repo(),
    }
    .execute(alice, LIMIT)
    .await
    .unwrap();
    assert_eq!(book.user_id, alice);
    assert_eq!(book.default_address_id, Some(work));
    assert_eq!(book.addresses.len(), 2);
}

// ── Ownership ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_not_set_foreign_address_as_default() {
    let db = TestDb::new();
    let alice = db.seed_user(1, "alice_01");
    let bob = db.seed_user(2, "bob_0001");
    let alice_home = create(&db, alice, "Home").await.unwrap();
    let bob_home = create(&db, bob, "Home").await.unwrap();

    let usecase = SetDefaultAddressUseCase {
        repo: db.address_repo(),
    };
    usecase.execute(alice, alice_home).await.unwrap();

    let result = usecase.execute(alice, bob_home).await;
    assert!(
        matches!(result, Err(UsersServiceError::Forbidden)),
        "expected Forbidden, got {result:?}"
    );
    assert_eq!(db.user(alice).default_address_id, Some(alice_home));
    assert_eq!(db.user(bob).default_address_id, None);
}

#[tokio::test]
async fn should_not_modify_foreign_address() {
    let db = TestDb::new();
    let alice = db.seed_user(1, "alice_01");
    let bob = db.seed_user(2, "bob_0001");
    let bob_home = create(&db, bob, "Home").await.unwrap();

    let rename = RenameAddressUseCase {
        repo: db.address_repo(),
    };
    let result = rename.execute(alice, bob_home, "Mine").await;
    assert!(matches!(result, Err(UsersServiceError::Forbidden)));

    let update = UpdateAddressUseCase {
        repo: db.address_repo(),
    };
    let result = update
        .execute(alice, bob_home, address_fields("Mine"))
        .await;
    assert!(matches!(result, Err(UsersServiceError::Forbidden)));

    let delete = DeleteAddressUseCase {
        repo: db.address_repo(),
    };
    let result = delete.execute(alice, bob_home).await;
    assert!(matches!(result, Err(UsersServiceError::Forbidden)));

    let stored = db.address_repo().find_by_id(bob_home).await.unwrap().unwrap();
    assert_eq!(stored.fields.title, "Home");
    assert!(stored.is_active());
}

#[tokio::test]
async fn should_not_set_deleted_address_as_default() {
    let db = TestDb::new();
    let alice = db.seed_user(1, "alice_01");
    let home = create(&db, alice, "Home").await.unwrap();
    DeleteAddressUseCase {
        repo: db.address_repo(),
    }
    .execute(alice, home)
    .await
    .unwrap();

    let result = SetDefaultAddressUseCase {
        repo: db.address_repo(),
    }
    .execute(alice, home)
    .await;
    assert!(matches!(result, Err(UsersServiceError::AddressNotFound)));
    assert_eq!(db.user(alice).default_address_id, None);
}

// ── UpdateAddressUseCase / RenameAddressUseCase ──────────────────────────────

#[tokio::test]
async fn should_replace_all_editable_fields() {
    let db = TestDb::new();
    let alice = db.seed_user(1, "alice_01");
    let home = create(&db, alice, "Home").await.unwrap();

    let mut fields = address_fields("Parents");
    fields.receiver = "Carol".into();
    fields.tel = Some("010-12345678".into());
    let updated = UpdateAddressUseCase {
        repo: db.address_repo(),
    }
    .execute(alice, home, fields.clone())
    .await
    .unwrap();
    assert_eq!(updated.id, home);
    assert_eq!(updated.fields, fields);
}

#[tokio::test]
async fn should_rename_address() {
    let db = TestDb::new();
    let alice = db.seed_user(1, "alice_01");
    let home = create(&db, alice, "Home").await.unwrap();

    let title = RenameAddressUseCase {
        repo: db.address_repo(),
    }
    .execute(alice, home, "Office")
    .await
    .unwrap();
    assert_eq!(title, "Office");

    let stored = db.address_repo().find_by_id(home).await.unwrap().unwrap();
    assert_eq!(stored.fields.title, "Office");
}

#[tokio::test]
async fn should_leave_deleted_row_untouched_by_writes() {
    let db = TestDb::new();
    let alice = db.seed_user(1, "alice_01");
    let home = create(&db, alice, "Home").await.unwrap();

    let delete = DeleteAddressUseCase {
        repo: db.address_repo(),
    };
    delete.execute(alice, home).await.unwrap();

    let repo = db.address_repo();
    let mut fields = address_fields("Home");
    fields.receiver = "Bob".into();
    assert!(repo.update(home, &fields).await.unwrap().is_none());
    assert!(!repo.update_title(home, "Work").await.unwrap());

    let stored = repo.find_by_id(home).await.unwrap().unwrap();
    assert_eq!(stored.fields.receiver, "Alice");
    assert_eq!(stored.fields.title, "Home");
}
