use mall_auth_types::cookie::{CartCookie, CartCookieItem};
use mall_auth_types::token::validate_access_token;
use mall_domain::id::{SkuId, UserId};
use mall_users::error::UsersServiceError;
use mall_users::usecase::authorization::{LoginUseCase, MergeCartUseCase};
use mall_users::usecase::user::{
    CountMobileUseCase, CountUsernameUseCase, GetProfileUseCase, RegisterInput, RegisterUseCase,
};

use crate::helpers::{MockCartStore, MockSmsStore, TEST_JWT_SECRET, TestDb};

const MOBILE: &str = "13800138000";

fn register_input() -> RegisterInput {
    RegisterInput {
        username: "alice_01".into(),
        password: "password123".into(),
        password2: "password123".into(),
        mobile: MOBILE.into(),
        sms_code: "246810".into(),
        allow: true,
    }
}

async fn register(db: &TestDb, sms: &MockSmsStore) -> Result<UserId, UsersServiceError> {
    let out = RegisterUseCase {
        repo: db.user_repo(),
        sms: sms.clone(),
    }
    .execute(register_input(), TEST_JWT_SECRET)
    .await?;
    Ok(out.user.id)
}

// ── RegisterUseCase ──────────────────────────────────────────────────────────

#[tokio::test]
async fn should_register_and_consume_sms_code() {
    let db = TestDb::new();
    let sms = MockSmsStore::with_code(MOBILE, "246810");

    let out = RegisterUseCase {
        repo: db.user_repo(),
        sms: sms.clone(),
    }
    .execute(register_input(), TEST_JWT_SECRET)
    .await
    .unwrap();

    let info = validate_access_token(&out.token, TEST_JWT_SECRET).unwrap();
    assert_eq!(info.user_id, out.user.id);
    assert_eq!(info.username, "alice_01");
    assert!(sms.codes.lock().unwrap().get(MOBILE).is_none());
}

#[tokio::test]
async fn should_not_reuse_sms_code() {
    let db = TestDb::new();
    let sms = MockSmsStore::with_code(MOBILE, "246810");
    register(&db, &sms).await.unwrap();

    let result = RegisterUseCase {
        repo: db.user_repo(),
        sms: sms.clone(),
    }
    .execute(
        RegisterInput {
            username: "alice_02".into(),
            ..register_input()
        },
        TEST_JWT_SECRET,
    )
    .await;
    assert!(matches!(result, Err(UsersServiceError::InvalidSmsCode)));
}

// ── Availability counts ──────────────────────────────────────────────────────

#[tokio::test]
async fn should_count_registered_username_and_mobile() {
    let db = TestDb::new();
    let sms = MockSmsStore::with_code(MOBILE, "246810");

    let usernames = CountUsernameUseCase {
        repo: db.user_repo(),
    };
    let mobiles = CountMobileUseCase {
        repo: db.user_repo(),
    };
    assert_eq!(usernames.execute("alice_01").await.unwrap(), 0);
    assert_eq!(mobiles.execute(MOBILE).await.unwrap(), 0);

    register(&db, &sms).await.unwrap();
    assert_eq!(usernames.execute("alice_01").await.unwrap(), 1);
    assert_eq!(mobiles.execute(MOBILE).await.unwrap(), 1);
}

// ── LoginUseCase / MergeCartUseCase ──────────────────────────────────────────

#[tokio::test]
async fn should_login_with_username_or_mobile() {
    let db = TestDb::new();
    let sms = MockSmsStore::with_code(MOBILE, "246810");
    let id = register(&db, &sms).await.unwrap();

    let login = LoginUseCase {
        repo: db.user_repo(),
    };
    for account in ["alice_01", MOBILE] {
        let out = login
            .execute(account, "password123", TEST_JWT_SECRET)
            .await
            .unwrap();
        assert_eq!(out.user.id, id);
        let info = validate_access_token(&out.token, TEST_JWT_SECRET).unwrap();
        assert_eq!(info.user_id, id);
    }
}

#[tokio::test]
async fn should_not_reveal_which_credential_was_wrong() {
    let db = TestDb::new();
    let sms = MockSmsStore::with_code(MOBILE, "246810");
    register(&db, &sms).await.unwrap();

    let login = LoginUseCase {
        repo: db.user_repo(),
    };
    let wrong_password = login.execute("alice_01", "password999", TEST_JWT_SECRET).await;
    let unknown_user = login.execute("mallory_1", "password123", TEST_JWT_SECRET).await;
    assert!(matches!(wrong_password, Err(UsersServiceError::InvalidCredentials)));
    assert!(matches!(unknown_user, Err(UsersServiceError::InvalidCredentials)));
}

#[tokio::test]
async fn should_merge_cookie_cart_with_cookie_winning() {
    let carts = MockCartStore::default();
    let alice = UserId(1);
    carts
        .counts
        .lock()
        .unwrap()
        .entry(alice)
        .or_default()
        .extend([(SkuId(1), 5), (SkuId(2), 1)]);
    carts
        .selected
        .lock()
        .unwrap()
        .entry(alice)
        .or_default()
        .insert(SkuId(1));

    let mut cookie = CartCookie::new();
    cookie.insert(
        SkuId(1),
        CartCookieItem {
            count: 2,
            selected: false,
        },
    );
    cookie.insert(
        SkuId(3),
        CartCookieItem {
            count: 4,
            selected: true,
        },
    );
    MergeCartUseCase {
        cart: carts.clone(),
    }
    .execute(alice, Some(cookie))
    .await;

    let counts = carts.counts.lock().unwrap()[&alice].clone();
    assert_eq!(counts[&SkuId(1)], 2);
    assert_eq!(counts[&SkuId(2)], 1);
    assert_eq!(counts[&SkuId(3)], 4);
    let selected = carts.selected.lock().unwrap()[&alice].clone();
    assert!(!selected.contains(&SkuId(1)));
    assert!(selected.contains(&SkuId(3)));
}

// ── GetProfileUseCase ────────────────────────────────────────────────────────

#[tokio::test]
async fn should_return_profile_of_registered_user() {
    let db = TestDb::new();
    let sms = MockSmsStore::with_code(MOBILE, "246810");
    let id = register(&db, &sms).await.unwrap();

    let user = GetProfileUseCase {
        repo: db.user_repo(),
    }
    .execute(id)
    .await
    .unwrap();
    assert_eq!(user.username, "alice_01");
    assert_eq!(user.mobile, MOBILE);
    assert_eq!(user.email, None);
    assert!(!user.email_active);
}
