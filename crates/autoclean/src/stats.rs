//! Summaries over cleaned listings.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::input::DataTable;
use crate::schema::{CanonicalRole, ResolvedSchema};

/// Average mileage for one owner category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OwnerStat {
    pub owner: String,
    pub listings: usize,
    pub avg_mileage: f64,
}

/// Average mileage per owner value, highest average first.
///
/// Empty when either the owner or the mileage role was not resolved. Rows
/// with a missing owner or mileage are ignored.
pub fn owner_mileage_stats(table: &DataTable, schema: &ResolvedSchema) -> Vec<OwnerStat> {
    let index = |role| schema.column(role).and_then(|c| table.column_index(c));
    let (Some(owner), Some(mileage)) = (index(CanonicalRole::Owner), index(CanonicalRole::Mileage)) else {
        return Vec::new();
    };

    let mut totals: IndexMap<String, (usize, f64)> = IndexMap::new();
    for row in &table.rows {
        let (Some(name), Some(km)) = (row[owner].render(), row[mileage].as_f64()) else {
            continue;
        };
        let entry = totals.entry(name).or_insert((0, 0.0));
        entry.0 += 1;
        entry.1 += km;
    }

    let mut stats: Vec<OwnerStat> = totals
        .into_iter()
        .map(|(owner, (listings, sum))| OwnerStat {
            owner,
            listings,
            avg_mileage: sum / listings as f64,
        })
        .collect();

    stats.sort_by(|a, b| b.avg_mileage.total_cmp(&a.avg_mileage));
    stats
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Cleaner;

    #[test]
    fn test_owner_stats_sorted_by_average() {
        let outcome = Cleaner::new()
            .clean_bytes(
                b"name,year,price,km_driven,owner\n\
                  A,2015,100,1000,First Owner\n\
                  B,2014,100,3000,First Owner\n\
                  C,2010,100,9000,Second Owner\n",
            )
            .unwrap();

        let stats = owner_mileage_stats(&outcome.table, &outcome.schema);
        assert_eq!(stats.len(), 2);
        assert_eq!(stats[0].owner, "Second Owner");
        assert_eq!(stats[0].avg_mileage, 9000.0);
        assert_eq!(stats[1].listings, 2);
        assert_eq!(stats[1].avg_mileage, 2000.0);
    }

    #[test]
    fn test_owner_stats_need_both_roles() {
        let outcome = Cleaner::new()
            .clean_bytes(b"year,price,owner\n2015,100,First Owner\n")
            .unwrap();
        assert!(owner_mileage_stats(&outcome.table, &outcome.schema).is_empty());
    }
}
