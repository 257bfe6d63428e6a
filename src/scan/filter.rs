use crate::catalog::{DatabaseInfo, PartitionFunctionInfo};

/// Keeps accessible databases, then applies the inclusion list followed by
/// the exclusion list. Empty lists do not filter.
pub fn select_databases(
    databases: Vec<DatabaseInfo>,
    include: &[String],
    exclude: &[String],
) -> Vec<DatabaseInfo> {
    databases
        .into_iter()
        .filter(|db| db.is_accessible)
        .filter(|db| include.is_empty() || contains(include, &db.name))
        .filter(|db| !contains(exclude, &db.name))
        .collect()
}

pub fn select_partition_functions(
    functions: Vec<PartitionFunctionInfo>,
    names: &[String],
) -> Vec<PartitionFunctionInfo> {
    if names.is_empty() {
        return functions;
    }
    functions
        .into_iter()
        .filter(|function| contains(names, &function.name))
        .collect()
}

fn contains(list: &[String], name: &str) -> bool {
    list.iter().any(|entry| entry == name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::RangeType;
    use chrono::NaiveDate;

    fn db(name: &str, accessible: bool) -> DatabaseInfo {
        DatabaseInfo {
            name: name.to_string(),
            is_accessible: accessible,
            state: crate::catalog::ONLINE_STATE.to_string(),
        }
    }

    fn pf(name: &str) -> PartitionFunctionInfo {
        PartitionFunctionInfo {
            id: 65536,
            name: name.to_string(),
            create_date: NaiveDate::from_ymd_opt(2020, 1, 1)
                .and_then(|d| d.and_hms_opt(0, 0, 0))
                .expect("date"),
            number_of_partitions: 4,
            range_type: RangeType::Right,
            function_type: "RANGE".to_string(),
            is_system: false,
        }
    }

    fn names(list: &[String]) -> Vec<&str> {
        list.iter().map(String::as_str).collect()
    }

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn drops_inaccessible_databases() {
        let selected = select_databases(vec![db("a", true), db("b", false)], &[], &[]);
        let selected = selected.into_iter().map(|d| d.name).collect::<Vec<_>>();
        assert_eq!(names(&selected), vec!["a"]);
    }

    #[test]
    fn include_then_exclude() {
        let all = vec![db("a", true), db("b", true), db("c", true)];
        let selected = select_databases(all, &strings(&["a", "b"]), &strings(&["b"]));
        let selected = selected.into_iter().map(|d| d.name).collect::<Vec<_>>();
        assert_eq!(names(&selected), vec!["a"]);
    }

    #[test]
    fn exclusion_alone_keeps_the_rest() {
        let all = vec![db("a", true), db("b", true), db("c", true)];
        let selected = select_databases(all, &[], &strings(&["a"]));
        let selected = selected.into_iter().map(|d| d.name).collect::<Vec<_>>();
        assert_eq!(names(&selected), vec!["b", "c"]);
    }

    #[test]
    fn database_names_match_exactly() {
        let selected = select_databases(vec![db("Sales", true)], &strings(&["sales"]), &[]);
        assert!(selected.is_empty());
    }

    #[test]
    fn partition_function_filter() {
        let all = vec![pf("pf1"), pf("pf2"), pf("pf10")];
        let kept = select_partition_functions(all.clone(), &strings(&["pf1"]));
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].name, "pf1");

        let kept = select_partition_functions(all, &[]);
        assert_eq!(kept.len(), 3);
    }
}
