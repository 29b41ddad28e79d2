//! Tests for the domain user model.

use super::*;
use rstest::{fixture, rstest};
use serde_json::json;

const VALID_ID: &str = "3fa85f64-5717-4562-b3fc-2c963f66afa6";

#[fixture]
fn user() -> User {
    User::new(
        UserId::new(VALID_ID).expect("valid id"),
        Username::new("ada").expect("valid username"),
        EmailAddress::new("ada@example.com").expect("valid email"),
        None,
    )
}

#[rstest]
fn user_id_rejects_non_uuid() {
    assert_eq!(UserId::new("123"), Err(UserValidationError::InvalidId));
}

#[rstest]
fn user_id_round_trips_through_display() {
    let id = UserId::new(VALID_ID).expect("valid id");
    assert_eq!(id.to_string(), VALID_ID);
}

#[rstest]
#[case("", UserValidationError::EmptyUsername)]
#[case("   ", UserValidationError::EmptyUsername)]
fn username_rejects_blank(#[case] raw: &str, #[case] expected: UserValidationError) {
    assert_eq!(Username::new(raw), Err(expected));
}

#[rstest]
fn username_rejects_overlong_values() {
    let raw = "x".repeat(USERNAME_MAX + 1);
    assert_eq!(
        Username::new(raw),
        Err(UserValidationError::UsernameTooLong { max: USERNAME_MAX })
    );
}

#[rstest]
fn username_is_trimmed() {
    let name = Username::new("  grace  ").expect("valid username");
    assert_eq!(name.as_ref(), "grace");
}

#[rstest]
#[case("notvalid@c.")]
#[case("missing-at.example.com")]
#[case("two@@example.com")]
#[case("user@example")]
#[case("user@.example.com")]
fn email_rejects_malformed(#[case] raw: &str) {
    assert_eq!(EmailAddress::new(raw), Err(UserValidationError::InvalidEmail));
}

#[rstest]
fn email_is_lower_cased() {
    let email = EmailAddress::new(" Ada@Example.COM ").expect("valid email");
    assert_eq!(email.as_ref(), "ada@example.com");
}

#[rstest]
#[case("http://images.com/ada.png")]
#[case("https://cdn.example.org/a/b.jpg")]
#[case("http://127.0.0.1/avatar.png")]
fn avatar_accepts_http_links(#[case] raw: &str) {
    assert!(AvatarUrl::new(raw).is_ok());
}

#[rstest]
#[case("http://images.c")]
#[case("ftp://images.com/ada.png")]
#[case("images.com/ada.png")]
#[case("http://localhost/ada.png")]
#[case("https://images.c0m/ada.png")]
fn avatar_rejects_unusable_links(#[case] raw: &str) {
    assert_eq!(AvatarUrl::new(raw), Err(UserValidationError::InvalidAvatar));
}

#[rstest]
fn with_profile_keeps_unspecified_fields(user: User) {
    let avatar = AvatarUrl::new("https://images.com/ada.png").expect("valid avatar");
    let updated = user.clone().with_profile(None, Some(avatar.clone()));
    assert_eq!(updated.email(), user.email());
    assert_eq!(updated.avatar(), Some(&avatar));
}

#[rstest]
fn serialises_as_camel_case_json(user: User) {
    let value = serde_json::to_value(&user).expect("serialise user");
    assert_eq!(
        value,
        json!({
            "id": VALID_ID,
            "username": "ada",
            "email": "ada@example.com",
            "avatar": null,
        })
    );
}

#[rstest]
fn deserialising_validates_fields() {
    let result: Result<User, _> = serde_json::from_value(json!({
        "id": VALID_ID,
        "username": "ada",
        "email": "nope",
        "avatar": null,
    }));
    assert!(result.is_err());
}
