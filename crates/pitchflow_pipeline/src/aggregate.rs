//! Per-team averages over the raw statistics table.

use crate::warehouse::TableRef;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::collections::BTreeMap;

/// Averages of wins/draws/losses grouped by team name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AggregationQuery {
    pub source: TableRef,
}

impl AggregationQuery {
    pub fn new(source: TableRef) -> Self {
        Self { source }
    }

    /// The query as warehouse SQL.
    pub fn to_sql(&self) -> String {
        format!(
            "SELECT\n    \
             t.name AS team_name,\n    \
             AVG(t.statistics.wins) AS avg_wins,\n    \
             AVG(t.statistics.draws) AS avg_draws,\n    \
             AVG(t.statistics.losses) AS avg_losses\n\
             FROM\n    \
             `{}` AS t\n\
             GROUP BY\n    \
             t.name",
            self.source
        )
    }
}

/// One output row of the aggregation. Rows without a team name form a
/// single group with no name, as `GROUP BY` does with NULL.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamAverages {
    pub team_name: Option<String>,
    pub avg_wins: Option<f64>,
    pub avg_draws: Option<f64>,
    pub avg_losses: Option<f64>,
}

#[derive(Default)]
struct Mean {
    sum: f64,
    count: usize,
}

impl Mean {
    fn add(&mut self, value: Option<f64>) {
        if let Some(v) = value {
            self.sum += v;
            self.count += 1;
        }
    }

    fn value(&self) -> Option<f64> {
        (self.count > 0).then(|| self.sum / self.count as f64)
    }
}

#[derive(Default)]
struct TeamAccumulator {
    wins: Mean,
    draws: Mean,
    losses: Mean,
}

/// Group raw rows by `name` and average `statistics.{wins,draws,losses}`.
///
/// Only those fields are read; the rest of a row may have any shape. Any JSON
/// number counts towards an average, anything else is NULL and skipped. An
/// average with no values is `None`. Output is sorted by team name with the
/// unnamed group first.
pub fn aggregate_team_averages<'a, I>(rows: I) -> Vec<TeamAverages>
where
    I: IntoIterator<Item = &'a JsonValue>,
{
    let mut teams: BTreeMap<Option<String>, TeamAccumulator> = BTreeMap::new();

    for row in rows {
        let acc = teams.entry(team_name(row)).or_default();
        let stats = row.get("statistics");
        acc.wins.add(numeric_field(stats, "wins"));
        acc.draws.add(numeric_field(stats, "draws"));
        acc.losses.add(numeric_field(stats, "losses"));
    }

    teams
        .into_iter()
        .map(|(team_name, acc)| TeamAverages {
            team_name,
            avg_wins: acc.wins.value(),
            avg_draws: acc.draws.value(),
            avg_losses: acc.losses.value(),
        })
        .collect()
}

fn team_name(row: &JsonValue) -> Option<String> {
    match row.get("name")? {
        JsonValue::String(s) => Some(s.clone()),
        JsonValue::Number(n) => Some(n.to_string()),
        JsonValue::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn numeric_field(stats: Option<&JsonValue>, field: &str) -> Option<f64> {
    stats?.get(field)?.as_f64()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn aggregate(rows: &[JsonValue]) -> Vec<TeamAverages> {
        aggregate_team_averages(rows)
    }

    #[test]
    fn test_averages_grouped_by_name() {
        let result = aggregate(&[
            json!({"name": "Dinamo", "statistics": {"wins": 20, "draws": 5, "losses": 5}}),
            json!({"name": "Rapid", "statistics": {"wins": 10, "draws": 4, "losses": 2}}),
            json!({"name": "Dinamo", "statistics": {"wins": 10, "draws": 3, "losses": 2}}),
        ]);

        assert_eq!(
            result,
            vec![
                TeamAverages {
                    team_name: Some("Dinamo".to_string()),
                    avg_wins: Some(15.0),
                    avg_draws: Some(4.0),
                    avg_losses: Some(3.5),
                },
                TeamAverages {
                    team_name: Some("Rapid".to_string()),
                    avg_wins: Some(10.0),
                    avg_draws: Some(4.0),
                    avg_losses: Some(2.0),
                },
            ]
        );
    }

    #[test]
    fn test_missing_values_are_ignored() {
        let result = aggregate(&[
            json!({"name": "Dinamo", "statistics": {"wins": 6}}),
            json!({"name": "Dinamo"}),
        ]);

        assert_eq!(result.len(), 1);
        assert_eq!(result[0].avg_wins, Some(6.0));
        assert_eq!(result[0].avg_draws, None);
        assert_eq!(result[0].avg_losses, None);
    }

    #[test]
    fn test_unnamed_rows_form_their_own_group() {
        let result = aggregate(&[
            json!({"statistics": {"wins": 100}}),
            json!({"name": null, "statistics": {"wins": 50}}),
            json!({"name": "Dinamo", "statistics": {"wins": 1}}),
        ]);

        assert_eq!(result.len(), 2);
        assert_eq!(result[0].team_name, None);
        assert_eq!(result[0].avg_wins, Some(75.0));
        assert_eq!(result[1].team_name.as_deref(), Some("Dinamo"));
    }

    #[test]
    fn test_api_shaped_rows_and_fractional_values() {
        let result = aggregate(&[
            json!({
                "name": "Dinamo",
                "league": {"id": 283, "name": "Liga I"},
                "team": {"id": 635},
                "statistics": {"wins": 3, "draws": "n/a", "losses": {"total": 1}}
            }),
            json!({"name": "Dinamo", "league": "Liga 1", "statistics": {"wins": 2.5, "draws": 1}}),
        ]);

        assert_eq!(result.len(), 1);
        assert_eq!(result[0].avg_wins, Some(2.75));
        assert_eq!(result[0].avg_draws, Some(1.0));
        assert_eq!(result[0].avg_losses, None);
    }

    #[test]
    fn test_empty_input() {
        assert!(aggregate(&[]).is_empty());
    }

    #[test]
    fn test_sql_references_source_table() {
        let query = AggregationQuery::new(TableRef::new("p", "d", "auto_upload_table"));
        let sql = query.to_sql();
        assert!(sql.contains("FROM\n    `p.d.auto_upload_table` AS t"));
        assert!(sql.contains("AVG(t.statistics.wins) AS avg_wins"));
        assert!(sql.ends_with("GROUP BY\n    t.name"));
    }
}
