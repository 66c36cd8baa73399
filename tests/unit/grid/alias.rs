use std::sync::Arc;

use super::*;

#[test]
fn first_insert_wins() {
    let reg = AliasRegistry::new();
    assert!(reg.try_insert("robocorner", "a0"));
    assert!(!reg.try_insert("robocorner", "b1"));
    assert_eq!(reg.get("robocorner").as_deref(), Some("a0"));
    assert_eq!(reg.len(), 1);
}

#[test]
fn concurrent_inserts_admit_exactly_one() {
    let reg = Arc::new(AliasRegistry::new());
    let handles: Vec<_> = (0..8)
        .map(|i| {
            let reg = Arc::clone(&reg);
            std::thread::spawn(move || reg.try_insert("shared", &format!("a{i}")))
        })
        .collect();
    let wins = handles
        .into_iter()
        .map(|h| h.join().unwrap())
        .filter(|won| *won)
        .count();
    assert_eq!(wins, 1);
    assert!(reg.contains("shared"));
}

#[test]
fn empty_registry() {
    let reg = AliasRegistry::new();
    assert!(reg.is_empty());
    assert_eq!(reg.get("missing"), None);
}
