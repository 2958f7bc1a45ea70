use services::QuizReport;

/// Characters of question text kept in the per-question timing list.
pub const LABEL_CHARS: usize = 30;

/// Width of the longest bar in the timing chart.
pub const BAR_WIDTH: u64 = 30;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TimingRowVm {
    pub number: usize,
    pub label: String,
    pub seconds: String,
    pub bar: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResultsVm {
    pub score_line: String,
    pub rows: Vec<TimingRowVm>,
    pub saved: bool,
}

/// First `LABEL_CHARS` characters of `text` followed by `"..."`.
#[must_use]
pub fn truncate_label(text: &str) -> String {
    let head: String = text.chars().take(LABEL_CHARS).collect();
    format!("{head}...")
}

fn bar(tenths: u64, longest: u64) -> String {
    if longest == 0 {
        return String::new();
    }
    let len = (tenths * BAR_WIDTH + longest / 2) / longest;
    "█".repeat(usize::try_from(len).unwrap_or(0))
}

impl From<&QuizReport> for ResultsVm {
    fn from(report: &QuizReport) -> Self {
        let longest = report
            .timing_log
            .iter()
            .map(|entry| entry.tenths())
            .max()
            .unwrap_or(0);
        let rows = report
            .timing_log
            .iter()
            .enumerate()
            .map(|(i, entry)| TimingRowVm {
                number: i + 1,
                label: truncate_label(entry.question()),
                seconds: entry.seconds_label(),
                bar: bar(entry.tenths(), longest),
            })
            .collect();
        Self {
            score_line: format!("퀴즈 완료! 점수: {} / {}", report.score, report.total),
            rows,
            saved: report.saved,
        }
    }
}

impl ResultsVm {
    /// Numbered list of answered questions with their times.
    #[must_use]
    pub fn timing_lines(&self) -> Vec<String> {
        self.rows
            .iter()
            .map(|row| format!("{}. {} ⏰ {}초", row.number, row.label, row.seconds))
            .collect()
    }

    /// Horizontal bar chart, one bar per question number.
    #[must_use]
    pub fn chart_lines(&self) -> Vec<String> {
        let width = self.rows.len().to_string().len();
        self.rows
            .iter()
            .map(|row| format!("{:>width$} | {} {}", row.number, row.bar, row.seconds))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_core::model::TimingEntry;

    fn report() -> QuizReport {
        QuizReport {
            username: "kim".into(),
            score: 1,
            total: 2,
            timing_log: vec![
                TimingEntry::from_tenths("Which gas do plants absorb from the air?", 30),
                TimingEntry::from_tenths("Short one", 15),
            ],
            saved: false,
        }
    }

    #[test]
    fn labels_are_cut_to_thirty_chars() {
        assert_eq!(
            truncate_label("Which gas do plants absorb from the air?"),
            "Which gas do plants absorb fro..."
        );
        assert_eq!(truncate_label("광합성에서 식물이 흡수하는 기체는?"), "광합성에서 식물이 흡수하는 기체는?...");
    }

    #[test]
    fn results_list_and_chart() {
        let vm = ResultsVm::from(&report());
        assert_eq!(vm.score_line, "퀴즈 완료! 점수: 1 / 2");
        assert_eq!(
            vm.timing_lines(),
            vec![
                "1. Which gas do plants absorb fro... ⏰ 3.0초".to_string(),
                "2. Short one... ⏰ 1.5초".to_string(),
            ]
        );
        assert_eq!(vm.rows[0].bar.chars().count(), 30);
        assert_eq!(vm.rows[1].bar.chars().count(), 15);
        assert!(vm.chart_lines()[1].starts_with("2 | "));
    }

    #[test]
    fn zero_times_draw_no_bars() {
        let mut report = report();
        report.timing_log = vec![TimingEntry::from_tenths("q", 0)];
        let vm = ResultsVm::from(&report);
        assert!(vm.rows[0].bar.is_empty());
        assert_eq!(vm.chart_lines(), vec!["1 |  0.0".to_string()]);
    }
}
