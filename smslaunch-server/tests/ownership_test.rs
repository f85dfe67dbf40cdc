//! Contacts are only visible to the user who created them

mod common;

use common::{add_contact, bearer, create_test_server, list_contacts, register_user};
use serde_json::{json, Value};

#[tokio::test]
async fn test_users_see_only_their_contacts() {
    let server = create_test_server();
    let alice = register_user(&server, "alice@example.com", "password123").await;
    let bob = register_user(&server, "bob@example.com", "password123").await;

    add_contact(&server, &alice, "Alice's friend", "5551112222").await;
    add_contact(&server, &bob, "Bob's friend", "5553334444").await;

    let alice_phones = list_contacts(&server, &alice).await;
    assert_eq!(alice_phones.len(), 1);
    assert_eq!(alice_phones[0]["name"], "Alice's friend");

    let bob_phones = list_contacts(&server, &bob).await;
    assert_eq!(bob_phones.len(), 1);
    assert_eq!(bob_phones[0]["name"], "Bob's friend");
}

#[tokio::test]
async fn test_cannot_modify_foreign_contact() {
    let server = create_test_server();
    let alice = register_user(&server, "alice@example.com", "password123").await;
    let bob = register_user(&server, "bob@example.com", "password123").await;

    let contact = add_contact(&server, &alice, "Private", "5551112222").await;
    let id = contact["id"].as_u64().unwrap();
    let (name, value) = bearer(&bob);

    // Indistinguishable from a contact that does not exist
    let response = server
        .put(&format!("/api/phones/{}", id))
        .add_header(name.clone(), value.clone())
        .json(&json!({ "name": "Hijacked", "number": "5550000000" }))
        .await;
    assert_eq!(response.status_code(), 404);
    let body: Value = response.json();
    assert_eq!(body["message"], "Phone number not found");

    let response = server
        .delete(&format!("/api/phones/{}", id))
        .add_header(name, value)
        .await;
    assert_eq!(response.status_code(), 404);

    let phones = list_contacts(&server, &alice).await;
    assert_eq!(phones.len(), 1);
    assert_eq!(phones[0]["name"], "Private");
    assert_eq!(phones[0]["number"], "5551112222");
}
