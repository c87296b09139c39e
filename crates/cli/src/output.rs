use chrono::{DateTime, SecondsFormat, Utc};
use stacktoken_query::{BatchOutcome, ViewOutput};
use stacktoken_types::{Answer, Question, TimestampMs};

const TICKER: &str = "EGLD";

pub fn now() -> TimestampMs {
    TimestampMs::from_millis(Utc::now().timestamp_millis().max(0) as u64)
}

fn date(ts: TimestampMs) -> String {
    i64::try_from(ts.as_millis())
        .ok()
        .and_then(DateTime::<Utc>::from_timestamp_millis)
        .map(|d| d.to_rfc3339_opts(SecondsFormat::Secs, true))
        .unwrap_or_else(|| format!("{}ms", ts.as_millis()))
}

pub fn question_line(q: &Question, decimals: u32, now: TimestampMs) -> String {
    let approved = q
        .approved_answer_id
        .map(|id| format!(" approved=#{id}"))
        .unwrap_or_default();
    format!(
        "#{} [{}] {} {TICKER} due {} by {}{approved}: {}",
        q.question_id,
        q.effective_status(now),
        q.locked_amount.to_display(decimals),
        date(q.deadline),
        q.creator,
        q.title,
    )
}

pub fn answer_line(a: &Answer) -> String {
    format!(
        "#{} on #{} ({} votes{}) {} by {}: {}",
        a.answer_id,
        a.question_id,
        a.votes,
        if a.approved { ", approved" } else { "" },
        date(a.created_at),
        a.creator,
        a.title,
    )
}

fn batch_lines<T>(batch: &BatchOutcome<T>, line: impl Fn(&T) -> String) -> Vec<String> {
    let mut out: Vec<String> = batch.records.iter().map(line).collect();
    for f in &batch.failed {
        out.push(format!("! record {} dropped ({}): {}", f.index, f.fingerprint, f.error));
    }
    out
}

pub fn question_batch_lines(
    batch: &BatchOutcome<Question>,
    decimals: u32,
    now: TimestampMs,
) -> Vec<String> {
    batch_lines(batch, |q| question_line(q, decimals, now))
}

pub fn answer_batch_lines(batch: &BatchOutcome<Answer>) -> Vec<String> {
    batch_lines(batch, answer_line)
}

pub fn view_lines(out: &ViewOutput, decimals: u32, now: TimestampMs) -> Vec<String> {
    match out {
        ViewOutput::Questions(batch) => question_batch_lines(batch, decimals, now),
        ViewOutput::Answers(batch) => answer_batch_lines(batch),
        ViewOutput::QuestionDetails(Some(q)) => vec![question_line(q, decimals, now)],
        ViewOutput::QuestionDetails(None) => vec!["no such question".to_string()],
        ViewOutput::Count(n) => vec![n.to_string()],
        ViewOutput::Flag(b) => vec![b.to_string()],
        ViewOutput::Address(a) => vec![a.to_string()],
        ViewOutput::Stats(s) => vec![format!(
            "questions={} answers={} paused={}",
            s.total_questions, s.total_answers, s.paused
        )],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use stacktoken_types::{Address, Amount, QuestionStatus};

    #[test]
    fn question_line_shows_display_amount_and_effective_status() {
        let q = Question {
            question_id: 5,
            creator: Address::ZERO,
            title: "Gas fees?".into(),
            description: String::new(),
            deadline: TimestampMs::from_millis(1_700_000_000_000),
            locked_amount: "250000000000000000".parse::<Amount>().unwrap(),
            created_at: TimestampMs::from_millis(1_690_000_000_000),
            status: QuestionStatus::Created,
            approved_answer_id: None,
        };
        let line = question_line(&q, 18, TimestampMs::from_millis(1_800_000_000_000));
        assert_eq!(
            line,
            "#5 [Expired] 0.25 EGLD due 2023-11-14T22:13:20Z by \
             erd1qqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqq6gq4hu: Gas fees?"
        );
    }

    #[test]
    fn stats_line() {
        let out = ViewOutput::Stats(stacktoken_types::ContractStats {
            total_questions: 2,
            total_answers: 5,
            paused: false,
        });
        assert_eq!(
            view_lines(&out, 18, TimestampMs::default()),
            vec!["questions=2 answers=5 paused=false".to_string()]
        );
    }
}
