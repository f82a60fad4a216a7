//! Terminal practice client.
//!
//! Usage: `practice [subject] [grade]`, talking to `PRACTICE_API_URL`
//! (default `http://localhost:8081`).

use kids_learning_api::{
    models::{Difficulty, Subject},
    practice::{PracticeClient, PracticeError, PracticeSession},
};
use tokio::io::{AsyncBufReadExt, BufReader};

const HELP: &str = "Commands: new [easy|medium|hard], check <answer>, hint, reveal, help, quit.\n\
                    Any other line is taken as your answer.";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .init();

    let mut args = std::env::args().skip(1);
    let subject = Subject::from_name(&args.next().unwrap_or_else(|| "math".to_string()));
    let grade = match args.next() {
        Some(raw) => raw
            .parse::<u8>()
            .map_err(|e| anyhow::anyhow!("Invalid grade {:?}: {}", raw, e))?,
        None => 2,
    };

    let base_url =
        std::env::var("PRACTICE_API_URL").unwrap_or_else(|_| "http://localhost:8081".to_string());
    let client = PracticeClient::new(base_url);
    let mut session = PracticeSession::new(subject, grade);

    println!("Practice: {} for grade {}", subject, grade);
    println!("{}", HELP);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        let (command, rest) = line.split_once(' ').unwrap_or((line, ""));

        match command {
            "" => continue,
            "quit" | "exit" => break,
            "help" => println!("{}", HELP),
            "new" => {
                if !rest.is_empty() {
                    match Difficulty::parse(rest) {
                        Some(difficulty) => session.set_difficulty(difficulty),
                        None => {
                            println!("Unknown difficulty {:?}", rest);
                            continue;
                        }
                    }
                }
                new_exercise(&client, &mut session).await;
            }
            "hint" => hint(&client, &mut session).await,
            "reveal" => match session.reveal_answer() {
                Ok(answer) => println!("The answer is: {}", answer),
                Err(e) => report(e),
            },
            "check" => check(&mut session, rest),
            _ => check(&mut session, line),
        }
    }

    Ok(())
}

async fn new_exercise(client: &PracticeClient, session: &mut PracticeSession) {
    if let Err(e) = session.begin_generation() {
        return report(e);
    }
    println!("Generating...");

    let result = client
        .generate_exercise(session.subject(), session.difficulty(), session.grade())
        .await;
    if let Err(e) = &result {
        tracing::warn!("Error generating exercise: {:#}", e);
    }
    session.finish_generation(result.ok());

    match session.exercise() {
        Some(exercise) => println!("\n{}\n", exercise),
        None => println!("Could not get an exercise. Try again."),
    }
}

async fn hint(client: &PracticeClient, session: &mut PracticeSession) {
    let request = match session.begin_hint() {
        Ok(request) => request,
        Err(e) => return report(e),
    };

    let result = client.generate_hint(&request).await;
    if let Err(e) = &result {
        tracing::warn!("Error generating hint: {:#}", e);
    }
    session.finish_hint(result.ok());

    if let Some(hint) = session.hint() {
        println!("Hint: {}", hint);
    }
}

fn check(session: &mut PracticeSession, answer: &str) {
    session.set_user_answer(answer);
    match session.check_answer() {
        Ok(true) => println!("Correct! Great job!"),
        Ok(false) => println!("Not quite right. Try again or get a hint!"),
        Err(e) => report(e),
    }
}

fn report(err: PracticeError) {
    println!("{}", err);
}
