use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufWriter, Write};

use crate::common::Solution;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleStep {
    pub t: usize,
    pub x: usize,
    pub y: usize,
}

/// Per-agent timed positions plus the total cost, keyed by agent name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schedule {
    pub schedule: BTreeMap<String, Vec<ScheduleStep>>,
    pub cost: usize,
}

impl Schedule {
    /// `names` is index-aligned with `solution.paths`; unnamed agents are
    /// called `agent<index>`.
    pub fn from_solution(names: &[String], solution: &Solution) -> Self {
        let schedule = solution
            .paths
            .iter()
            .enumerate()
            .map(|(index, path)| {
                let name = names
                    .get(index)
                    .cloned()
                    .unwrap_or_else(|| format!("agent{index}"));
                let steps = path
                    .steps
                    .iter()
                    .enumerate()
                    .map(|(t, &(x, y))| ScheduleStep { t, x, y })
                    .collect();
                (name, steps)
            })
            .collect();

        Schedule {
            schedule,
            cost: solution.cost(),
        }
    }

    /// Writes JSON when `path` ends in `.json`, YAML otherwise.
    pub fn write_to_file(&self, path: &str) -> Result<()> {
        let file = File::create(path).with_context(|| format!("failed to create {path}"))?;
        let mut writer = BufWriter::new(file);

        if path.ends_with(".json") {
            serde_json::to_writer_pretty(&mut writer, self)?;
        } else {
            serde_yaml::to_writer(&mut writer, self)?;
        }
        writer.flush()?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::Path;

    fn solution() -> Solution {
        Solution {
            paths: vec![
                Path::new(0, vec![(0, 1), (1, 1), (2, 1)]),
                Path::new(1, vec![(1, 0), (1, 0), (1, 1), (1, 2)]),
            ],
        }
    }

    #[test]
    fn test_schedule_from_solution() {
        let names = vec!["left".to_string()];
        let schedule = Schedule::from_solution(&names, &solution());

        assert_eq!(schedule.cost, 5);
        assert_eq!(
            schedule.schedule["left"],
            vec![
                ScheduleStep { t: 0, x: 0, y: 1 },
                ScheduleStep { t: 1, x: 1, y: 1 },
                ScheduleStep { t: 2, x: 2, y: 1 },
            ]
        );
        assert_eq!(schedule.schedule["agent1"].len(), 4);
        assert_eq!(schedule.schedule["agent1"][3], ScheduleStep { t: 3, x: 1, y: 2 });
    }

    #[test]
    fn test_write_yaml_and_json() {
        let names = vec!["agent0".to_string(), "agent1".to_string()];
        let schedule = Schedule::from_solution(&names, &solution());
        let dir = std::env::temp_dir();

        let yaml_path = dir.join("grid_cbs_schedule_test.yaml");
        let yaml_path = yaml_path.to_str().unwrap();
        schedule.write_to_file(yaml_path).unwrap();
        let yaml = std::fs::read_to_string(yaml_path).unwrap();
        assert!(yaml.contains("cost: 5"));
        let parsed: Schedule = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(parsed, schedule);

        let json_path = dir.join("grid_cbs_schedule_test.json");
        let json_path = json_path.to_str().unwrap();
        schedule.write_to_file(json_path).unwrap();
        let json: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(json_path).unwrap()).unwrap();
        assert_eq!(json["cost"], 5);
        assert_eq!(json["schedule"]["agent1"][1]["t"], 1);
    }
}
