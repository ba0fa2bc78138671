use std::collections::HashMap;

use ims_id::{LecturerId, RegistrationId, Uuid};
use proptest::prelude::*;

use super::*;

fn lecturer(n: u128) -> LecturerId {
    LecturerId::from_uuid(Uuid::from_u128(0x1000 + n))
}

fn registration(n: u128) -> RegistrationId {
    RegistrationId::from_uuid(Uuid::from_u128(0x2000 + n))
}

fn student(n: u128, department: Option<&str>) -> DemandUnit {
    DemandUnit::new(registration(n), department)
}

#[test]
fn test_single_lecturer_takes_whole_department() {
    // Two unassigned CS students; the third (already assigned) never reaches
    // the allocator.
    let demand = vec![student(1, Some("CS")), student(2, Some("CS"))];
    let supply = vec![SupplyUnit::new(lecturer(1), "CS", 5)];

    let allocation = allocate(&demand, supply);

    assert_eq!(allocation.assigned(), 2);
    assert!(allocation
        .records
        .iter()
        .all(|r| r.lecturer_id == lecturer(1) && r.status == RegistrationStatus::LecturerConfirmed));
    assert_eq!(allocation.remaining_capacity[0].slots_remaining, 3);
    assert_eq!(allocation.skipped_count(), 0);
}

#[test]
fn test_student_without_matching_department_is_skipped() {
    let demand = vec![student(1, Some("CS")), student(2, Some("EE"))];
    let supply = vec![SupplyUnit::new(lecturer(1), "CS", 2)];

    let allocation = allocate(&demand, supply);

    assert_eq!(allocation.assigned(), 1);
    assert_eq!(allocation.records[0].registration_id, registration(1));
    assert_eq!(
        allocation.skipped,
        vec![Skipped {
            registration_id: registration(2),
            reason: SkipReason::UnknownDepartment,
        }]
    );
}

#[test]
fn test_tie_goes_to_first_lecturer_then_rebalances() {
    let demand = vec![student(1, Some("CS")), student(2, Some("CS"))];
    let supply = vec![
        SupplyUnit::new(lecturer(1), "CS", 3),
        SupplyUnit::new(lecturer(2), "CS", 3),
    ];

    let allocation = allocate(&demand, supply);

    assert_eq!(allocation.records[0].lecturer_id, lecturer(1));
    assert_eq!(allocation.records[1].lecturer_id, lecturer(2));
    let remaining: Vec<u32> = allocation
        .remaining_capacity
        .iter()
        .map(|u| u.slots_remaining)
        .collect();
    assert_eq!(remaining, vec![2, 2]);
}

#[test]
fn test_prefers_lecturer_with_most_remaining_slots() {
    let demand: Vec<_> = (1..=4).map(|n| student(n, Some("CS"))).collect();
    let supply = vec![
        SupplyUnit::new(lecturer(1), "CS", 1),
        SupplyUnit::new(lecturer(2), "CS", 3),
    ];

    let picks: Vec<LecturerId> = allocate(&demand, supply)
        .records
        .iter()
        .map(|r| r.lecturer_id)
        .collect();

    // [1,3] -> 2, [1,2] -> 2, [1,1] -> 1 (tie, first), [0,1] -> 2
    assert_eq!(picks, vec![lecturer(2), lecturer(2), lecturer(1), lecturer(2)]);
}

#[test]
fn test_missing_or_blank_department_is_skipped() {
    let demand = vec![student(1, None), student(2, Some("  ")), student(3, Some("CS"))];
    let supply = vec![SupplyUnit::new(lecturer(1), "CS", 1)];

    let allocation = allocate(&demand, supply);

    assert_eq!(allocation.assigned(), 1);
    let reasons: Vec<SkipReason> = allocation.skipped.iter().map(|s| s.reason).collect();
    assert_eq!(reasons, vec![SkipReason::NoDepartment, SkipReason::NoDepartment]);
}

#[test]
fn test_department_exhausted_mid_pass() {
    let demand: Vec<_> = (1..=3).map(|n| student(n, Some("EE"))).collect();
    let supply = vec![SupplyUnit::new(lecturer(1), "EE", 2)];

    let allocation = allocate(&demand, supply);

    assert_eq!(allocation.assigned(), 2);
    assert_eq!(
        allocation.skipped,
        vec![Skipped {
            registration_id: registration(3),
            reason: SkipReason::DepartmentExhausted,
        }]
    );
    assert_eq!(allocation.remaining_capacity[0].slots_remaining, 0);
}

#[test]
fn test_zero_capacity_units_are_never_picked() {
    let demand = vec![student(1, Some("CS"))];
    let supply = vec![
        SupplyUnit::new(lecturer(1), "CS", 0),
        SupplyUnit::new(lecturer(2), "CS", 1),
    ];

    let allocation = allocate(&demand, supply);

    assert_eq!(allocation.records[0].lecturer_id, lecturer(2));
}

#[test]
fn test_department_match_is_exact() {
    let demand = vec![student(1, Some("cs"))];
    let supply = vec![SupplyUnit::new(lecturer(1), "CS", 1)];

    let allocation = allocate(&demand, supply);

    assert_eq!(allocation.assigned(), 0);
    assert_eq!(allocation.skipped[0].reason, SkipReason::UnknownDepartment);
}

#[test]
fn test_empty_inputs() {
    let allocation = allocate(&[], Vec::new());
    assert_eq!(allocation.assigned(), 0);
    assert_eq!(allocation.skipped_count(), 0);

    let allocation = allocate(&[student(1, Some("CS"))], Vec::new());
    assert_eq!(allocation.skipped[0].reason, SkipReason::UnknownDepartment);
}

#[test]
fn test_department_index_keeps_supply_order() {
    let mut index = DepartmentIndex::build(vec![
        SupplyUnit::new(lecturer(1), "ME", 1),
        SupplyUnit::new(lecturer(2), "CS", 2),
        SupplyUnit::new(lecturer(3), "ME", 3),
    ]);

    assert_eq!(index.pick("CS"), Ok(lecturer(2)));
    assert_eq!(index.pick("ME"), Ok(lecturer(3)));

    let units = index.into_units();
    let lecturers: Vec<_> = units.iter().map(|unit| unit.lecturer_id).collect();
    assert_eq!(lecturers, vec![lecturer(1), lecturer(2), lecturer(3)]);
    let slots: Vec<_> = units.iter().map(|unit| unit.slots_remaining).collect();
    assert_eq!(slots, vec![1, 1, 2]);
}

#[test]
fn test_department_index_pick_consumes_slot() {
    let mut index = DepartmentIndex::build(vec![SupplyUnit::new(lecturer(1), "CS", 1)]);

    assert_eq!(index.pick("CS"), Ok(lecturer(1)));
    assert_eq!(index.pick("CS"), Err(SkipReason::DepartmentExhausted));
    assert_eq!(index.pick("EE"), Err(SkipReason::UnknownDepartment));
    assert_eq!(index.into_units()[0].slots_remaining, 0);
}

#[test]
fn test_status_tags() {
    assert_eq!(RegistrationStatus::Registered.as_str(), "registered");
    assert_eq!(RegistrationStatus::LecturerConfirmed.as_str(), "lecturer_confirmed");
}

// =============================================================================
// Properties
// =============================================================================

const DEPARTMENTS: [&str; 3] = ["CS", "EE", "ME"];

fn department_strategy() -> impl Strategy<Value = Option<String>> {
    prop_oneof![
        1 => Just(None::<String>),
        6 => prop::sample::select(DEPARTMENTS.to_vec()).prop_map(|d| Some(d.to_string())),
    ]
}

fn snapshot_strategy() -> impl Strategy<Value = (Vec<DemandUnit>, Vec<SupplyUnit>)> {
    let demand = prop::collection::vec(department_strategy(), 0..20).prop_map(|departments| {
        departments
            .into_iter()
            .enumerate()
            .map(|(n, department)| DemandUnit::new(registration(n as u128), department))
            .collect::<Vec<_>>()
    });
    let supply = prop::collection::vec(
        (prop::sample::select(DEPARTMENTS.to_vec()), 0u32..5),
        0..8,
    )
    .prop_map(|units| {
        units
            .into_iter()
            .enumerate()
            .map(|(n, (department, slots))| SupplyUnit::new(lecturer(n as u128), department, slots))
            .collect::<Vec<_>>()
    });
    (demand, supply)
}

proptest! {
    #[test]
    fn records_never_exceed_matchable_demand((demand, supply) in snapshot_strategy()) {
        let matchable = demand.iter().filter(|d| d.department().is_some()).count();
        let allocation = allocate(&demand, supply);
        prop_assert!(allocation.assigned() <= matchable);
        prop_assert_eq!(allocation.assigned() + allocation.skipped_count(), demand.len());
    }

    #[test]
    fn lecturers_never_exceed_initial_slots((demand, supply) in snapshot_strategy()) {
        let initial: HashMap<LecturerId, u32> =
            supply.iter().map(|u| (u.lecturer_id, u.slots_remaining)).collect();
        let allocation = allocate(&demand, supply);

        let mut used: HashMap<LecturerId, u32> = HashMap::new();
        for record in &allocation.records {
            *used.entry(record.lecturer_id).or_default() += 1;
        }
        for (lecturer_id, count) in used {
            prop_assert!(count <= initial[&lecturer_id]);
        }
        for unit in &allocation.remaining_capacity {
            let taken = allocation.records.iter().filter(|r| r.lecturer_id == unit.lecturer_id).count() as u32;
            prop_assert_eq!(unit.slots_remaining + taken, initial[&unit.lecturer_id]);
        }
    }

    #[test]
    fn allocation_is_deterministic((demand, supply) in snapshot_strategy()) {
        let first = allocate(&demand, supply.clone());
        let second = allocate(&demand, supply);
        prop_assert_eq!(first, second);
    }

    #[test]
    fn every_pick_has_maximal_remaining_capacity((demand, supply) in snapshot_strategy()) {
        let allocation = allocate(&demand, supply.clone());
        let departments: HashMap<_, _> =
            demand.iter().map(|d| (d.registration_id, d.department().map(str::to_string))).collect();
        let mut remaining: Vec<SupplyUnit> = supply;

        for record in &allocation.records {
            let department = departments[&record.registration_id].clone();
            let chosen = remaining
                .iter()
                .position(|u| u.lecturer_id == record.lecturer_id)
                .unwrap();
            prop_assert_eq!(Some(remaining[chosen].department.clone()), department);

            let best = remaining
                .iter()
                .filter(|u| u.department == remaining[chosen].department)
                .map(|u| u.slots_remaining)
                .max()
                .unwrap_or(0);
            prop_assert!(remaining[chosen].slots_remaining >= best);
            prop_assert!(remaining[chosen].slots_remaining > 0);

            // first-encountered among equals
            let first_best = remaining
                .iter()
                .position(|u| u.department == remaining[chosen].department && u.slots_remaining == best)
                .unwrap();
            prop_assert_eq!(first_best, chosen);

            remaining[chosen].slots_remaining -= 1;
        }
    }
}
