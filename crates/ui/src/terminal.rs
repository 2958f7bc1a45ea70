//! Line-oriented front-end: configure, answer, review, save, restart.
//!
//! Works over any `BufRead`/`Write` pair so the whole flow can be scripted.

use std::io::{self, BufRead, Write};
use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, warn};

use quiz_core::model::{
    DEFAULT_QUESTION_COUNT, DifficultyFilter, SessionConfig, max_selectable_count,
};
use services::{QuizLoopService, QuizSession, SaveOutcome, SessionError};

use crate::views::ViewError;
use crate::vm::{FeedbackVm, QuestionScreenVm, ResultsVm, map_history};

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum TerminalError {
    #[error("terminal i/o failed: {0}")]
    Io(#[from] io::Error),
    #[error(transparent)]
    Session(#[from] SessionError),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Next {
    Restart,
    Quit,
}

pub struct TerminalUi<R, W> {
    quiz: Arc<QuizLoopService>,
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> TerminalUi<R, W> {
    #[must_use]
    pub fn new(quiz: Arc<QuizLoopService>, input: R, output: W) -> Self {
        Self {
            quiz,
            input,
            output,
        }
    }

    #[must_use]
    pub fn into_output(self) -> W {
        self.output
    }

    /// Run quizzes until the user quits or input ends.
    ///
    /// # Errors
    ///
    /// Returns `TerminalError::Io` if the terminal cannot be read or written
    /// and `TerminalError::Session` for failures the user cannot recover from.
    pub async fn run(&mut self) -> Result<(), TerminalError> {
        loop {
            let Some(config) = self.configure().await? else {
                return Ok(());
            };

            let mut session = self.quiz.new_session();
            if let Err(err) = self.quiz.configure_and_start(&mut session, config).await {
                warn!(error = %err, "quiz could not start");
                self.say(ViewError::from(&err).message())?;
                continue;
            }

            if !self.play(&mut session)? {
                return Ok(());
            }
            if self.results(&mut session).await? == Next::Quit {
                return Ok(());
            }
        }
    }

    // ─── CONFIGURING ───

    async fn configure(&mut self) -> Result<Option<SessionConfig>, TerminalError> {
        let difficulties = self.quiz.difficulties().await?;
        let max = max_selectable_count(self.quiz.bank_size().await?);

        self.say("")?;
        self.say("⚙️ 퀴즈 설정")?;
        let Some(username) = self.ask("🧑‍🎓 이름을 입력하세요: ")? else {
            return Ok(None);
        };
        let Some(filter) = self.pick_difficulty(&difficulties)? else {
            return Ok(None);
        };
        let Some(count) = self.pick_count(max)? else {
            return Ok(None);
        };

        let config = SessionConfig::new(username, filter, count).map_err(SessionError::from)?;
        debug!(?config, "configured");
        Ok(Some(config))
    }

    fn pick_difficulty(&mut self, tags: &[String]) -> io::Result<Option<DifficultyFilter>> {
        self.say("난이도 선택")?;
        self.say(format!("  0) {}", DifficultyFilter::LEGACY_ALL_LABEL))?;
        for (i, tag) in tags.iter().enumerate() {
            self.say(format!("  {}) {tag}", i + 1))?;
        }

        loop {
            let Some(raw) = self.ask("번호 또는 난이도 [0]: ")? else {
                return Ok(None);
            };
            let raw = raw.trim();
            if raw.is_empty() {
                return Ok(Some(DifficultyFilter::All));
            }
            match raw.parse::<usize>() {
                Ok(0) => return Ok(Some(DifficultyFilter::All)),
                Ok(n) if n <= tags.len() => return Ok(Some(DifficultyFilter::only(&tags[n - 1]))),
                Ok(_) => self.say(format!("0부터 {} 사이의 번호를 입력하세요.", tags.len()))?,
                Err(_) => {
                    let Ok(filter) = raw.parse::<DifficultyFilter>();
                    return Ok(Some(filter));
                }
            }
        }
    }

    fn pick_count(&mut self, max: usize) -> io::Result<Option<usize>> {
        let default = DEFAULT_QUESTION_COUNT.min(max);
        loop {
            let Some(raw) = self.ask(&format!("출제할 문제 수 (1-{max}) [{default}]: "))? else {
                return Ok(None);
            };
            let raw = raw.trim();
            if raw.is_empty() {
                return Ok(Some(default));
            }
            match raw.parse::<usize>() {
                Ok(n) if (1..=max).contains(&n) => return Ok(Some(n)),
                _ => self.say(format!("1부터 {max} 사이의 숫자를 입력하세요."))?,
            }
        }
    }

    // ─── IN PROGRESS ───

    /// Returns false if input ended before the last answer.
    fn play(&mut self, session: &mut QuizSession) -> Result<bool, TerminalError> {
        while let Some(view) = self.quiz.current_view(session) {
            let screen = QuestionScreenVm::from(&view);
            self.say("")?;
            for line in screen.lines() {
                self.say(line)?;
            }

            let Some(picked) = self.pick_choice(view.choices.len())? else {
                return Ok(false);
            };
            let feedback = self.quiz.answer(session, &view.choices[picked])?;
            let vm = FeedbackVm::from(&feedback);
            self.say(vm.verdict)?;
            self.say(vm.explanation)?;
        }
        Ok(true)
    }

    fn pick_choice(&mut self, choices: usize) -> io::Result<Option<usize>> {
        loop {
            let Some(raw) = self.ask(&format!("답 번호 (1-{choices}): "))? else {
                return Ok(None);
            };
            match raw.trim().parse::<usize>() {
                Ok(n) if (1..=choices).contains(&n) => return Ok(Some(n - 1)),
                _ => self.say(format!("1부터 {choices} 사이의 번호를 입력하세요."))?,
            }
        }
    }

    // ─── FINISHED ───

    async fn results(&mut self, session: &mut QuizSession) -> Result<Next, TerminalError> {
        let Some(report) = session.report() else {
            return Ok(Next::Quit);
        };
        let vm = ResultsVm::from(&report);
        self.say("")?;
        self.say(&vm.score_line)?;
        self.say("⏱️ 문제별 풀이 시간")?;
        for line in vm.timing_lines() {
            self.say(line)?;
        }
        self.say("📊 성취도 분석")?;
        for line in vm.chart_lines() {
            self.say(line)?;
        }
        self.show_history().await?;

        loop {
            let menu = if session.is_saved() {
                "[h] 전체 기록  [r] 다시 시작  [q] 종료: "
            } else {
                "[s] 결과 저장  [h] 전체 기록  [r] 다시 시작  [q] 종료: "
            };
            let Some(command) = self.ask(menu)? else {
                return Ok(Next::Quit);
            };
            match command.trim().to_lowercase().as_str() {
                "s" => match self.quiz.save(session).await {
                    Ok(SaveOutcome::Saved(_)) => {
                        self.say("✅ 저장 완료!")?;
                        self.show_history().await?;
                    }
                    Ok(SaveOutcome::AlreadySaved) => self.say("이미 저장된 결과입니다.")?,
                    Err(err) => self.say(ViewError::from(&err).message())?,
                },
                "h" => self.show_history().await?,
                "r" => {
                    session.reset()?;
                    return Ok(Next::Restart);
                }
                "q" => return Ok(Next::Quit),
                _ => self.say("알 수 없는 명령입니다.")?,
            }
        }
    }

    async fn show_history(&mut self) -> io::Result<()> {
        match self.quiz.history().await {
            Ok(Some(records)) => {
                self.say("📚 전체 기록:")?;
                for line in map_history(&records).lines() {
                    self.say(line)?;
                }
                Ok(())
            }
            Ok(None) => Ok(()),
            Err(err) => {
                warn!(error = %err, "history could not be read");
                self.say(ViewError::from(&err).message())
            }
        }
    }

    // ─── IO ───

    fn say(&mut self, line: impl AsRef<str>) -> io::Result<()> {
        writeln!(self.output, "{}", line.as_ref())
    }

    /// Prompt and read one line; `None` once input is exhausted.
    fn ask(&mut self, prompt: &str) -> io::Result<Option<String>> {
        write!(self.output, "{prompt}")?;
        self.output.flush()?;
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
    }
}

impl<R, W> std::fmt::Debug for TerminalUi<R, W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TerminalUi")
            .field("quiz", &self.quiz)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    use quiz_core::model::Question;
    use quiz_core::time::fixed_clock;
    use services::QuestionBank;
    use storage::repository::{HistoryRepository, InMemoryRepository};

    /// Every option is the answer, so any pick scores.
    fn sure_thing(text: &str, difficulty: &str) -> Question {
        Question::new(
            text,
            ["o".into(), "o".into(), "o".into(), "o".into()],
            "o",
            difficulty,
            "all the same",
        )
        .unwrap()
    }

    fn harness(script: &str) -> (TerminalUi<Cursor<Vec<u8>>, Vec<u8>>, InMemoryRepository) {
        let repo = InMemoryRepository::with_questions(vec![
            sure_thing("First question", "easy"),
            sure_thing("Second question", "hard"),
        ]);
        let bank = Arc::new(QuestionBank::new(Arc::new(repo.clone())));
        let quiz = Arc::new(QuizLoopService::new(fixed_clock(), bank, Arc::new(repo.clone())));
        let ui = TerminalUi::new(quiz, Cursor::new(script.as_bytes().to_vec()), Vec::new());
        (ui, repo)
    }

    fn output(ui: TerminalUi<Cursor<Vec<u8>>, Vec<u8>>) -> String {
        String::from_utf8(ui.into_output()).unwrap()
    }

    #[tokio::test]
    async fn full_round_saves_once() {
        let (mut ui, repo) = harness("kim\n0\n\n1\n4\ns\ns\nq\n");
        ui.run().await.unwrap();
        let text = output(ui);

        assert!(text.contains("문제 1/2: "));
        assert!(text.contains("📶 난이도: "));
        assert!(text.contains("⏱️ 경과 시간: 0.0초"));
        assert!(text.contains("퀴즈 완료! 점수: 2 / 2"));
        assert!(text.contains("✅ 저장 완료!"));
        assert!(text.contains("📚 전체 기록:"));
        assert!(text.contains("이미 저장된 결과입니다."));

        let rows = repo.load_history().await.unwrap().unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].username, "kim");
        assert_eq!(rows[0].timing_summary, "1:0.0s; 2:0.0s");
    }

    #[tokio::test]
    async fn invalid_entries_are_asked_again() {
        let (mut ui, _repo) = harness("lee\n7\n2\n0\n3\n1\n9\n1\nq\n");
        ui.run().await.unwrap();
        let text = output(ui);

        assert!(text.contains("0부터 2 사이의 번호를 입력하세요."));
        assert!(text.contains("1부터 2 사이의 숫자를 입력하세요."));
        assert!(text.contains("1부터 4 사이의 번호를 입력하세요."));
        assert!(text.contains("문제 1/1: Second question"));
        assert!(text.contains("퀴즈 완료! 점수: 1 / 1"));
    }

    #[tokio::test]
    async fn unknown_difficulty_reports_empty_pool() {
        let (mut ui, _repo) = harness("park\nexpert\n1\n");
        ui.run().await.unwrap();
        let text = output(ui);

        assert!(text.contains(ViewError::EmptyPool.message()));
        assert_eq!(text.matches("⚙️ 퀴즈 설정").count(), 2);
    }

    #[tokio::test]
    async fn restart_begins_a_new_configuration() {
        let (mut ui, repo) = harness("kim\n1\n1\n1\nr\nlee\n전체\n2\n1\n1\ns\nq\n");
        ui.run().await.unwrap();
        let text = output(ui);

        assert_eq!(text.matches("⚙️ 퀴즈 설정").count(), 2);
        assert!(text.contains("퀴즈 완료! 점수: 1 / 1"));
        assert!(text.contains("퀴즈 완료! 점수: 2 / 2"));

        let rows = repo.load_history().await.unwrap().unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].username, "lee");
    }

    #[tokio::test]
    async fn input_ending_mid_quiz_saves_nothing() {
        let (mut ui, repo) = harness("kim\n0\n2\n1\n");
        ui.run().await.unwrap();
        assert!(repo.load_history().await.unwrap().is_none());
    }
}
