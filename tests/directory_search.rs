// Directory query service: search, sort, pagination and lookups.

mod common;

use identity_server::error::IdentityError;
use identity_server::models::account::AccountUpdate;
use identity_server::storage::AccountQuery;

use common::{harness, new_account, Harness};

async fn seed(h: &Harness) {
    for (username, email, phone) in [
        ("alice", "alice@example.com", "555-0101"),
        ("bob", "bob@example.com", "555-0102"),
        ("carol", "carol@aliara.net", "555-0103"),
        ("dave", "dave@example.com", "555-2345"),
    ] {
        let mut account = new_account(username, email, "Secret123!", true);
        account.phone = phone.to_string();
        h.accounts.create_user(account).await.unwrap();
    }
}

#[tokio::test]
async fn test_search_matches_substrings_case_insensitively() {
    let h = harness();
    seed(&h).await;

    let page = h
        .directory
        .paginate(AccountQuery {
            search: Some("ALI".to_string()),
            ..Default::default()
        })
        .await
        .unwrap();

    // "ali" hits alice (name/username/email) and carol (email domain)
    assert_eq!(page.total, 2);
    let usernames: Vec<&str> = page
        .users
        .iter()
        .map(|u| u.account.username.as_str())
        .collect();
    assert!(usernames.contains(&"alice"));
    assert!(usernames.contains(&"carol"));
}

#[tokio::test]
async fn test_search_matches_phone_numbers() {
    let h = harness();
    seed(&h).await;

    let page = h
        .directory
        .paginate(AccountQuery {
            search: Some("2345".to_string()),
            ..Default::default()
        })
        .await
        .unwrap();

    assert_eq!(page.total, 1);
    assert_eq!(page.users[0].account.username, "dave");
}

#[tokio::test]
async fn test_total_reflects_full_set_not_page_size() {
    let h = harness();
    seed(&h).await;

    let page = h
        .directory
        .paginate(AccountQuery {
            limit: 2,
            page: 2,
            order_by: Some("username".to_string()),
            ..Default::default()
        })
        .await
        .unwrap();

    assert_eq!(page.total, 4);
    assert_eq!(page.page, 2);
    assert_eq!(page.users.len(), 2);
    assert_eq!(page.users[0].account.username, "carol");
    assert_eq!(page.users[1].account.username, "dave");
}

#[tokio::test]
async fn test_descending_order() {
    let h = harness();
    seed(&h).await;

    let page = h
        .directory
        .paginate(AccountQuery {
            order_by: Some("username".to_string()),
            order_desc: true,
            ..Default::default()
        })
        .await
        .unwrap();

    let usernames: Vec<&str> = page
        .users
        .iter()
        .map(|u| u.account.username.as_str())
        .collect();
    assert_eq!(usernames, vec!["dave", "carol", "bob", "alice"]);
}

#[tokio::test]
async fn test_deleted_accounts_are_excluded() {
    let h = harness();
    seed(&h).await;

    let bob = h
        .directory
        .find_user_by_username("bob")
        .await
        .unwrap()
        .unwrap();
    let deletion = h.accounts.delete_user(&bob.account.id).await.unwrap();
    assert!(deletion.delete_success);

    let page = h.directory.paginate(AccountQuery::default()).await.unwrap();
    assert_eq!(page.total, 3);
    assert!(page.users.iter().all(|u| u.account.username != "bob"));

    assert!(h
        .directory
        .find_user_by_username("bob")
        .await
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn test_profiles_carry_resolved_roles() {
    let h = harness();
    seed(&h).await;

    let users = h.directory.find_users().await.unwrap();
    assert_eq!(users.len(), 4);
    assert!(users
        .iter()
        .all(|u| u.role.as_ref().map(|r| r.name.as_str()) == Some("user")));
}

#[tokio::test]
async fn test_find_user_not_found() {
    let h = harness();

    let err = h.directory.find_user("no-such-id").await.unwrap_err();
    assert!(matches!(err, IdentityError::NotFound(_)));
}

#[tokio::test]
async fn test_update_refreshes_timestamp_and_fields() {
    let h = harness();
    seed(&h).await;

    let alice = h
        .directory
        .find_user_by_username("alice")
        .await
        .unwrap()
        .unwrap();
    let before = alice.account.updated_at;

    let updated = h
        .accounts
        .update_user(
            &alice.account.id,
            AccountUpdate {
                name: Some("Alice Renamed".to_string()),
                phone: Some("555-9999".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.account.name, "Alice Renamed");
    assert_eq!(updated.account.phone, "555-9999");
    assert!(updated.account.updated_at >= before);
    // Untouched fields survive
    assert_eq!(updated.account.email, "alice@example.com");
}

#[tokio::test]
async fn test_update_cannot_steal_a_taken_username() {
    let h = harness();
    seed(&h).await;

    let bob = h
        .directory
        .find_user_by_username("bob")
        .await
        .unwrap()
        .unwrap();

    let err = h
        .accounts
        .update_user(
            &bob.account.id,
            AccountUpdate {
                username: Some("alice".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();

    assert!(matches!(err, IdentityError::Duplicate { field } if field == "username"));
}
