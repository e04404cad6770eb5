use std::io::{self, Write};

use oca_scoring::{
    AnswerValue, ClientInfo, Error, Gender, NormTables, TestSession, QUESTIONS,
};

fn main() -> Result<(), Error> {
    env_logger::init();

    let info = read_client_info()?;
    let mut session = TestSession::new();
    session.begin(info);

    println!();
    println!("Answer each question with [y]es, [m]aybe, or [n]o.");
    println!();

    for question in QUESTIONS.questions() {
        println!("{}. {}", question.id, question.text);
        loop {
            match ask("> ")?.parse::<AnswerValue>() {
                Ok(value) => {
                    session.set_answer(question.id, value);
                    break;
                }
                Err(_) => println!("Please answer y, m, or n."),
            }
        }
    }

    let norms = NormTables::reference();
    match session.result(&norms) {
        Some(result) => {
            println!();
            println!("{}", result.summary());
            println!();
            for (scale, percentile) in result.percentiles.iter() {
                println!("  {scale}  {:<14} {percentile:>5}", scale.label());
            }
            println!();
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
        None => println!("Test incomplete, no result produced."),
    }
    Ok(())
}

fn read_client_info() -> Result<ClientInfo, Error> {
    let name = ask("Name: ")?;
    let phone = ask("Phone: ")?;
    let email = ask("Email: ")?;
    let city = ask("City: ")?;

    let age = loop {
        match ask("Age: ")?.parse::<u32>() {
            Ok(age) => break age,
            Err(_) => println!("Please enter a whole number."),
        }
    };
    let gender = loop {
        match ask("Gender (m/f): ")?.parse::<Gender>() {
            Ok(gender) => break gender,
            Err(_) => println!("Please answer m or f."),
        }
    };

    Ok(ClientInfo {
        name,
        phone,
        email,
        city,
        age,
        gender,
    })
}

fn ask(prompt: &str) -> Result<String, Error> {
    print!("{prompt}");
    io::stdout().flush()?;
    let mut buffer = String::new();
    io::stdin().read_line(&mut buffer)?;
    Ok(buffer.trim().to_string())
}
