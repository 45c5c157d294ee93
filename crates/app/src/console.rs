//! Line-oriented rendering and input for the terminal front end.

use std::io::{self, BufRead, Write};

use quiz_services::{AnswerOutcome, QuizError, QuizLoopService, QuizSession};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Next,
    Previous,
    /// One-based choice number as typed by the user.
    Choose(usize),
    Submit,
    Restart,
    Quit,
}

impl Command {
    pub fn parse(line: &str) -> Option<Self> {
        match line.trim() {
            "n" | "next" => Some(Self::Next),
            "p" | "prev" | "previous" => Some(Self::Previous),
            "s" | "submit" => Some(Self::Submit),
            "r" | "restart" => Some(Self::Restart),
            "q" | "quit" => Some(Self::Quit),
            other => other.parse::<usize>().ok().filter(|n| *n > 0).map(Self::Choose),
        }
    }
}

pub fn render(session: &QuizSession, out: &mut impl Write) -> io::Result<()> {
    if let Some(result) = session.result() {
        writeln!(out, "Your result: {}/{}", result.score(), result.total())?;
        writeln!(out, "[r] try again  [q] quit")?;
        return Ok(());
    }

    let progress = session.progress();
    writeln!(out, "Step {}/{}", progress.position(), progress.total)?;

    match (session.current_step(), session.current_question()) {
        (Some(step), Some(question)) => {
            writeln!(out, "{}", question.text())?;
            if question.is_answerable() {
                let selected = session.answer_for(step.id());
                for (idx, choice) in question.choices().iter().enumerate() {
                    let mark = if selected == Some(choice.as_str()) { "x" } else { " " };
                    writeln!(out, "  [{mark}] {}. {choice}", idx + 1)?;
                }
            }
        }
        (Some(_), None) => writeln!(out, "(this step has no content)")?,
        (None, _) => {}
    }

    let forward = if progress.is_last_step() { "[s] submit" } else { "[n] next" };
    writeln!(out, "[p] previous  {forward}  [q] quit")
}

/// Apply one command. Returns `false` when the user asked to quit.
fn apply(
    command: Command,
    service: &QuizLoopService,
    session: &mut QuizSession,
    out: &mut impl Write,
) -> io::Result<bool> {
    let outcome: Result<(), QuizError> = match command {
        Command::Quit => return Ok(false),
        Command::Next => session.advance().map(drop),
        Command::Previous => session.retreat().map(drop),
        Command::Submit => service.submit(session).map(drop),
        Command::Restart => service.restart(session),
        Command::Choose(number) => {
            let choice = session
                .current_question()
                .and_then(|q| q.choices().get(number - 1))
                .cloned();
            match choice {
                Some(choice) => session.record_current_answer(&choice).map(|outcome| {
                    if outcome == AnswerOutcome::Ignored {
                        tracing::debug!("choice ignored for this step");
                    }
                }),
                None => {
                    writeln!(out, "no choice numbered {number}")?;
                    Ok(())
                }
            }
        }
    };

    if let Err(err) = outcome {
        writeln!(out, "{err}")?;
    }
    Ok(true)
}

pub fn run_session(
    service: &QuizLoopService,
    session: &mut QuizSession,
    input: impl BufRead,
    out: &mut impl Write,
) -> io::Result<()> {
    render(session, out)?;
    for line in input.lines() {
        let line = line?;
        match Command::parse(&line) {
            Some(command) => {
                if !apply(command, service, session, out)? {
                    break;
                }
            }
            None => writeln!(out, "unknown command: {}", line.trim())?,
        }
        render(session, out)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use quiz_content::InMemoryContentSource;
    use quiz_core::model::{Question, QuestionKind, QuestionRef, Step, StepId};
    use quiz_core::time::fixed_clock;

    #[test]
    fn parses_commands() {
        assert_eq!(Command::parse(" n "), Some(Command::Next));
        assert_eq!(Command::parse("previous"), Some(Command::Previous));
        assert_eq!(Command::parse("2"), Some(Command::Choose(2)));
        assert_eq!(Command::parse("0"), None);
        assert_eq!(Command::parse("maybe"), None);
    }

    #[tokio::test]
    async fn scripted_run_reports_score() {
        let source = InMemoryContentSource::new();
        for id in 1..=2 {
            source
                .push_step(
                    Step::new(StepId::new(format!("s{id}")), QuestionRef::new(format!("q{id}"))),
                    Question::from_answer_list("Pick B", QuestionKind::MultipleChoice, "A,B", "B"),
                )
                .unwrap();
        }
        let service = QuizLoopService::new(fixed_clock(), Arc::new(source));
        let mut session = service.start().await.unwrap();

        let script = "2\nn\n1\ns\nq\n";
        let mut out = Vec::new();
        run_session(&service, &mut session, script.as_bytes(), &mut out).unwrap();

        let printed = String::from_utf8(out).unwrap();
        assert!(printed.contains("Your result: 1/2"));
        assert_eq!(session.score(), Some(1));
    }
}
