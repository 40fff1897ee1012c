//! Grouped rows

use std::collections::HashMap;
use std::rc::Rc;

use super::stage;
use crate::core::GroupInfo;
use crate::core::Row;
use crate::core::RowModel;
use crate::core::RowModelFactory;
use crate::core::Table;
use crate::fns::AggregationFn;
use crate::memo::ById;
use crate::model::RowData;
use crate::model::Value;

/// Nests the rows under one synthetic group row per distinct grouping value,
/// one level per grouped column.
///
/// Groups appear in the order their first row appears upstream. A group
/// row's id is `column:value`, prefixed by its parent group's id and `>`.
/// Data rows end up below the last level with their depth shifted by the
/// number of grouped columns.
pub fn grouped_row_model<T: RowData>() -> RowModelFactory<T> {
    stage(
        "getGroupedRowModel",
        |table: &Table<T>| {
            (
                ById(table.get_pre_grouped_row_model()),
                ById(table.get_all_leaf_columns()),
                table.get_state().grouping().to_vec(),
            )
        },
        |table, (pre, _, grouping)| {
            let grouping: Vec<String> = grouping
                .iter()
                .filter(|id| table.get_column(id).is_some())
                .cloned()
                .collect();
            if pre.0.is_empty() || grouping.is_empty() {
                return pre.0.clone();
            }
            let grouper = Grouper::new(table, grouping);
            Rc::new(RowModel::from_rows(grouper.group(&pre.0.rows, 0, None)))
        },
    )
}

struct Grouper<'a, T> {
    table: &'a Table<T>,
    grouping: Rc<Vec<String>>,
    aggregators: Rc<HashMap<String, AggregationFn<T>>>,
}

impl<'a, T: RowData> Grouper<'a, T> {
    fn new(table: &'a Table<T>, grouping: Vec<String>) -> Self {
        let aggregators = table
            .get_all_leaf_columns()
            .iter()
            .filter(|column| !grouping.contains(&column.id))
            .filter_map(|column| {
                column
                    .get_aggregation_fn(table)
                    .map(|aggregate| (column.id.clone(), aggregate))
            })
            .collect();
        Self {
            table,
            grouping: Rc::new(grouping),
            aggregators: Rc::new(aggregators),
        }
    }

    fn group(&self, rows: &[Rc<Row<T>>], depth: usize, parent_id: Option<&str>) -> Vec<Rc<Row<T>>> {
        if depth >= self.grouping.len() {
            return self.relevel(rows, depth, parent_id);
        }
        let column_id = &self.grouping[depth];

        let mut buckets: Vec<(Value, Vec<Rc<Row<T>>>)> = Vec::new();
        let mut by_key: HashMap<String, usize> = HashMap::new();
        for row in rows {
            let value = row.get_grouping_value(column_id);
            let key = value.to_string();
            match by_key.get(&key) {
                Some(&slot) => buckets[slot].1.push(row.clone()),
                None => {
                    by_key.insert(key, buckets.len());
                    buckets.push((value, vec![row.clone()]));
                }
            }
        }

        buckets
            .into_iter()
            .enumerate()
            .map(|(index, (value, members))| {
                let id = match parent_id {
                    Some(parent_id) => format!("{}>{}:{}", parent_id, column_id, value),
                    None => format!("{}:{}", column_id, value),
                };
                let sub_rows = self.group(&members, depth + 1, Some(&id));
                let leaf_rows = if depth + 1 >= self.grouping.len() {
                    flatten(&sub_rows)
                } else {
                    sub_rows
                        .iter()
                        .flat_map(|sub_row| sub_row.leaf_rows().iter().cloned())
                        .collect()
                };
                let original = members[0].original.clone();
                let mut row = self
                    .table
                    .create_row(id, original, index, depth, parent_id.map(str::to_string));
                row.set_group(GroupInfo {
                    grouping_column_id: column_id.clone(),
                    grouping_value: value,
                    leaf_rows,
                    grouped_rows: sub_rows.clone(),
                    grouped_columns: self.grouping.clone(),
                    aggregators: self.aggregators.clone(),
                });
                row.sub_rows = sub_rows;
                Rc::new(row)
            })
            .collect()
    }

    /// Re-parents data rows under their group and shifts their depth.
    fn relevel(&self, rows: &[Rc<Row<T>>], depth: usize, parent_id: Option<&str>) -> Vec<Rc<Row<T>>> {
        rows.iter()
            .map(|row| {
                let sub_rows = self.relevel(&row.sub_rows, depth + 1, Some(&row.id));
                Rc::new(row.derive(self.table, depth, parent_id.map(str::to_string), sub_rows))
            })
            .collect()
    }
}

fn flatten<T>(rows: &[Rc<Row<T>>]) -> Vec<Rc<Row<T>>> {
    let mut flat = Vec::new();
    for row in rows {
        flat.push(row.clone());
        flat.extend(flatten(&row.sub_rows));
    }
    flat
}
