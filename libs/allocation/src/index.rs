//! Supply grouped by department.

use std::cmp::Reverse;
use std::collections::BTreeMap;

use ims_id::LecturerId;

use crate::model::{SkipReason, SupplyUnit};

/// Supply units grouped by department.
///
/// Units are stored once, in supply order; each department keeps the indices
/// of its members in that same order so the stable tie-break survives
/// grouping. Departments iterate in key order.
#[derive(Debug, Clone, Default)]
pub struct DepartmentIndex {
    units: Vec<SupplyUnit>,
    departments: BTreeMap<String, Vec<usize>>,
}

impl DepartmentIndex {
    /// Group supply units by department, preserving their order.
    pub fn build(supply: impl IntoIterator<Item = SupplyUnit>) -> Self {
        let units: Vec<SupplyUnit> = supply.into_iter().collect();
        let mut departments: BTreeMap<String, Vec<usize>> = BTreeMap::new();
        for (position, unit) in units.iter().enumerate() {
            departments
                .entry(unit.department.clone())
                .or_default()
                .push(position);
        }

        Self { units, departments }
    }

    /// Pick a lecturer for one student of `department` and consume one slot.
    ///
    /// Candidates with no slots left are ignored. The rest are ordered by
    /// remaining slots, highest first, with a stable sort so equal candidates
    /// keep supply order; the first one wins.
    pub fn pick(&mut self, department: &str) -> Result<LecturerId, SkipReason> {
        let members = self
            .departments
            .get(department)
            .ok_or(SkipReason::UnknownDepartment)?;

        let mut candidates: Vec<usize> = members
            .iter()
            .copied()
            .filter(|&position| self.units[position].has_capacity())
            .collect();
        candidates.sort_by_key(|&position| Reverse(self.units[position].slots_remaining));

        let &chosen = candidates.first().ok_or(SkipReason::DepartmentExhausted)?;
        let unit = &mut self.units[chosen];
        unit.slots_remaining -= 1;
        Ok(unit.lecturer_id)
    }

    /// Consume the index, returning the units in supply order.
    pub fn into_units(self) -> Vec<SupplyUnit> {
        self.units
    }
}
