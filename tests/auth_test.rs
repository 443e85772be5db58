//! Authentication tests: covers the hashed password gate and the
//! access state machine.

use course_insights::auth::{AccessGate, AccessState, GateError};

const TEST_PASSWORD: &str = "password123";

#[test]
fn test_gate_accepts_only_the_configured_password() {
    let gate = AccessGate::new(TEST_PASSWORD).expect("Failed to build gate");

    assert!(gate.check(TEST_PASSWORD));
    assert!(!gate.check("wrongpassword"));
    assert!(!gate.check(""));
}

#[test]
fn test_gates_for_the_same_password_are_independent() {
    let first = AccessGate::new(TEST_PASSWORD).expect("Failed to build gate");
    let second = AccessGate::new(TEST_PASSWORD).expect("Failed to build gate");

    assert!(first.check(TEST_PASSWORD));
    assert!(second.check(TEST_PASSWORD));
    assert!(!format!("{first:?}").contains(TEST_PASSWORD));
}

#[test]
fn test_empty_configured_password_is_rejected() {
    let err = AccessGate::new("").expect_err("empty password");
    assert!(matches!(err, GateError::EmptyPassword));
    assert_eq!(err.to_string(), "dashboard password must not be empty");
}

#[test]
fn test_state_machine_transitions() {
    let gate = AccessGate::new(TEST_PASSWORD).expect("gate");

    let state = AccessState::default();
    assert_eq!(state, AccessState::Locked);

    let state = state.submit(&gate, "wrongpassword");
    assert_eq!(state, AccessState::Locked);

    let state = state.submit(&gate, TEST_PASSWORD);
    assert_eq!(state, AccessState::Unlocked);

    // Terminal for the session
    assert_eq!(state.submit(&gate, ""), AccessState::Unlocked);
}

#[test]
fn test_gate_is_case_and_whitespace_sensitive() {
    let gate = AccessGate::new(TEST_PASSWORD).expect("gate");
    assert!(!gate.check("PASSWORD123"));
    assert!(!gate.check(" password123"));
    assert!(gate.check(TEST_PASSWORD));
}
