//! Tests for groups and the membership choke point.

use super::*;
use rstest::{fixture, rstest};

fn full_fields() -> GroupFields {
    GroupFields {
        name: Some("Night Owls".to_owned()),
        description: Some("Weekly vampire chronicle".to_owned()),
        schedule: Some("Fridays 20:00".to_owned()),
        location: Some("Lisbon".to_owned()),
        chronic: Some("By Night".to_owned()),
    }
}

fn clear(fields: &mut GroupFields, field: GroupField) {
    match field {
        GroupField::Name => fields.name = None,
        GroupField::Description => fields.description = None,
        GroupField::Schedule => fields.schedule = None,
        GroupField::Location => fields.location = None,
        GroupField::Chronic => fields.chronic = None,
    }
}

#[fixture]
fn master() -> UserId {
    UserId::random()
}

#[rstest]
fn complete_fields_build_details() {
    let details = GroupDetails::try_from_fields(full_fields()).expect("complete attributes");
    assert_eq!(details.name(), "Night Owls");
    assert_eq!(details.schedule(), "Fridays 20:00");
    assert_eq!(details.chronic(), "By Night");
}

#[rstest]
fn each_missing_field_is_reported() {
    for field in GroupField::ALL {
        let mut fields = full_fields();
        clear(&mut fields, field);
        let err = GroupDetails::try_from_fields(fields).expect_err("missing field must fail");
        assert_eq!(err, GroupValidationError::MissingField { field });
    }
}

#[rstest]
#[case("")]
#[case("   ")]
fn blank_fields_are_rejected(#[case] blank: &str) {
    let fields = GroupFields {
        location: Some(blank.to_owned()),
        ..full_fields()
    };
    let err = GroupDetails::try_from_fields(fields).expect_err("blank field must fail");
    assert_eq!(err.field(), GroupField::Location);
    assert_eq!(err.to_string(), "location must not be empty");
}

#[rstest]
fn patch_replaces_only_provided_fields() {
    let details = GroupDetails::try_from_fields(full_fields()).expect("complete attributes");
    let patch = GroupDetailsPatch::try_from_fields(GroupFields {
        name: Some("Early Birds".to_owned()),
        ..GroupFields::default()
    })
    .expect("valid patch");

    let patched = details.clone().patched(patch);

    assert_eq!(patched.name(), "Early Birds");
    assert_eq!(patched.description(), details.description());
    assert_eq!(patched.location(), details.location());
}

#[rstest]
fn patch_rejects_blank_values() {
    let err = GroupDetailsPatch::try_from_fields(GroupFields {
        chronic: Some(" ".to_owned()),
        ..GroupFields::default()
    })
    .expect_err("blank patch must fail");
    assert_eq!(
        err,
        GroupValidationError::EmptyField {
            field: GroupField::Chronic
        }
    );
}

#[rstest]
fn empty_patch_is_detected() {
    let patch = GroupDetailsPatch::try_from_fields(GroupFields::default()).expect("valid patch");
    assert!(patch.is_empty());
}

#[rstest]
#[case("night", true)]
#[case("vampire", true)]
#[case("lisbon", false)]
fn text_matches_name_or_description(#[case] needle: &str, #[case] expected: bool) {
    let details = GroupDetails::try_from_fields(full_fields()).expect("complete attributes");
    assert_eq!(details.matches_text(needle), expected);
}

#[rstest]
fn founding_enrols_master(master: UserId) {
    let details = GroupDetails::try_from_fields(full_fields()).expect("complete attributes");
    let group = Group::found(GroupId::random(), details, master, Utc::now());
    assert_eq!(group.master(), &master);
    assert_eq!(group.membership().members(), &[master]);
}

#[rstest]
fn admit_appends_in_join_order(master: UserId) {
    let mut membership = Membership::founded_by(master);
    let first = UserId::random();
    let second = UserId::random();

    assert_eq!(
        membership.apply(MembershipChange::Admit(first)),
        Ok(MembershipDelta::Admitted(first))
    );
    assert_eq!(
        membership.apply(MembershipChange::Admit(second)),
        Ok(MembershipDelta::Admitted(second))
    );
    assert_eq!(membership.members(), &[master, first, second]);
}

#[rstest]
fn admitting_twice_is_unchanged(master: UserId) {
    let mut membership = Membership::founded_by(master);
    assert_eq!(
        membership.apply(MembershipChange::Admit(master)),
        Ok(MembershipDelta::Unchanged(master))
    );
    assert_eq!(membership.members().len(), 1);
}

#[rstest]
fn master_cannot_be_removed(master: UserId) {
    let mut membership = Membership::founded_by(master);
    assert_eq!(
        membership.apply(MembershipChange::Remove(master)),
        Err(MembershipError::MasterRemoval)
    );
    assert!(membership.contains(&master));
}

#[rstest]
fn removing_a_stranger_is_refused(master: UserId) {
    let mut membership = Membership::founded_by(master);
    assert_eq!(
        membership.apply(MembershipChange::Remove(UserId::random())),
        Err(MembershipError::NotAMember)
    );
}

#[rstest]
fn removing_a_member_keeps_the_rest(master: UserId) {
    let member = UserId::random();
    let mut membership =
        Membership::restore(master, vec![master, member]).expect("master present");
    assert_eq!(
        membership.apply(MembershipChange::Remove(member)),
        Ok(MembershipDelta::Removed(member))
    );
    assert_eq!(membership.members(), &[master]);
}

#[rstest]
fn restore_requires_master(master: UserId) {
    assert_eq!(
        Membership::restore(master, vec![UserId::random()]),
        Err(MembershipError::MasterMissing)
    );
}

#[rstest]
fn restore_collapses_duplicates(master: UserId) {
    let member = UserId::random();
    let membership =
        Membership::restore(master, vec![master, member, master, member]).expect("master present");
    assert_eq!(membership.members(), &[master, member]);
}
