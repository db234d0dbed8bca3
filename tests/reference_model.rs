//! Cross-checks `SkipList` against a sorted `Vec` holding the same values.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use skipset::{check_integrity, SkipList};

fn check_against(reference: &[i32], list: &SkipList<i32>) {
    assert_eq!(reference.len(), list.len());
    assert_eq!(list.iter().count(), list.len());
    assert_eq!(list.iter().len(), list.len());
    for (i, (expected, actual)) in reference.iter().zip(list).enumerate() {
        assert_eq!(expected, actual, "mismatch at index {}", i);
    }
    let violations = check_integrity(list);
    assert!(violations.is_empty(), "violations: {:?}", violations);
}

fn run_mixed_workload(min: i32, max: i32) {
    let list_seeds = [33, 44, 3, 41, 57, 44];
    let value_seeds = [78, 41, 12, 59, 97, 49];

    for (&list_seed, &value_seed) in list_seeds.iter().zip(value_seeds.iter()) {
        let mut list = SkipList::with_seed(list_seed);
        let mut reference = Vec::new();

        // Values removed again further down.
        for v in (-1000..1000).step_by(10) {
            reference.push(v);
            list.add(v);
            assert!(list.contains(&v));
        }
        reference.sort();
        check_against(&reference, &list);

        let mut rng = StdRng::seed_from_u64(value_seed);
        for _ in 0..10_000 {
            let v = rng.gen_range(min..max);
            reference.push(v);
            list.add(v);
        }
        reference.sort();
        check_against(&reference, &list);

        for v in (-1000..1000).step_by(10) {
            let position = reference.binary_search(&v).expect("value was added");
            reference.remove(position);
            assert!(list.remove(&v));
        }
        check_against(&reference, &list);

        for _ in 0..1_000 {
            let v = rng.gen::<i32>();
            reference.push(v);
            list.add(v);
        }
        reference.sort();
        check_against(&reference, &list);
    }
}

#[test]
fn test_narrow_range_with_many_duplicates() {
    run_mixed_workload(-1000, 1000);
}

#[test]
fn test_full_range() {
    run_mixed_workload(i32::MIN, i32::MAX);
}

#[test]
fn test_drain_in_random_order() {
    let mut rng = StdRng::seed_from_u64(97);
    let mut values: Vec<i32> = (0..2_000).map(|_| rng.gen_range(-500..500)).collect();
    let mut list: SkipList<i32> = values.iter().copied().collect();
    check_against(&sorted(&values), &list);

    while !values.is_empty() {
        let v = values.swap_remove(rng.gen_range(0..values.len()));
        assert!(list.remove(&v));
        assert_eq!(list.contains(&v), values.contains(&v));
    }
    assert_eq!(list.len(), 0);
    assert_eq!(list.iter().next(), None);
    assert!(check_integrity(&list).is_empty());
}

#[test]
fn test_contains_matches_reference() {
    let mut rng = StdRng::seed_from_u64(12);
    let mut list = SkipList::with_seed(12);
    let mut reference = Vec::new();
    for _ in 0..500 {
        let v = rng.gen_range(0..1_000);
        list.add(v);
        reference.push(v);
    }
    for v in -10..1_010 {
        assert_eq!(list.contains(&v), reference.contains(&v), "value: {}", v);
    }
}

fn sorted(values: &[i32]) -> Vec<i32> {
    let mut values = values.to_vec();
    values.sort();
    values
}
