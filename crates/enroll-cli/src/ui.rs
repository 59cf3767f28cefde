//! Interactive terminal front-end for the enrollment form.

use crate::error::AppResult;
use enrollment_form::EnrollmentForm;
use softpoint_client::EnrollmentSession;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::signal;
use tracing::{error, info};

/// Run the interactive loop until the user quits or stdin closes.
pub async fn run(session: &EnrollmentSession, form: &mut EnrollmentForm) -> AppResult<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    print_help();
    render(form);

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                if !dispatch(session, form, line.trim()).await {
                    break;
                }
                render(form);
            }
            _ = signal::ctrl_c() => {
                info!("Shutdown signal received");
                break;
            }
        }
    }

    Ok(())
}

/// Handle one input line. Returns false when the loop should end.
async fn dispatch(session: &EnrollmentSession, form: &mut EnrollmentForm, line: &str) -> bool {
    match line {
        "" => {}
        "/quit" => return false,
        "/help" => print_help(),
        "/open" => form.open_dropdown(),
        "/close" => form.close_dropdown(),
        "/submit" => submit(session, form).await,
        _ if line.starts_with("/search") => {
            form.search(line.strip_prefix("/search").unwrap_or_default().trim());
        }
        _ if line.starts_with("/pick") => {
            let arg = line.strip_prefix("/pick").unwrap_or_default().trim();
            match arg.parse::<usize>() {
                Ok(index) => {
                    if let Err(e) = form.pick(index) {
                        println!("! {}", e);
                    }
                }
                Err(_) => println!("Usage: /pick <number>"),
            }
        }
        _ if line.starts_with('/') => {
            println!("Unknown command: {} (try /help)", line);
        }
        // Anything else is phone input
        _ => form.phone_input(line),
    }

    true
}

/// Drive one submission through the session, reporting the outcome.
async fn submit(session: &EnrollmentSession, form: &mut EnrollmentForm) {
    let request = match form.begin_submit() {
        Ok(request) => request,
        Err(e) => {
            println!("! {}", e);
            return;
        }
    };

    match session.submit_verification(&request).await {
        Ok(receipt) => {
            form.complete_submit();
            println!("Submitted successfully: {}", receipt);
        }
        Err(e) => {
            form.abort_submit();
            error!("Submission failed: {}", e);
            println!("! Submission failed: {}", e);
        }
    }
}

fn render(form: &EnrollmentForm) {
    println!();

    match form.selected() {
        Some(country) => println!(
            "Country: {} ({})  [{}]",
            country.name,
            country.calling_code,
            country.flag_url()
        ),
        None => println!("Country: <none>"),
    }

    let display = form.phone_display();
    println!(
        "Phone:   {}",
        if display.is_empty() { "(000) 000-0000" } else { display }
    );

    if let Some(message) = form.error_message() {
        println!("!        {}", message);
    }

    if form.dropdown_open() {
        if !form.search_term().is_empty() {
            println!("Filter:  {:?}", form.search_term());
        }
        for (i, country) in form.visible_countries().iter().enumerate() {
            println!("  {:>3}. {} ({})", i, country.name, country.calling_code);
        }
        if form.visible_countries().is_empty() {
            println!("  (no matching countries)");
        }
    }

    print!("> ");
    use std::io::Write;
    let _ = std::io::stdout().flush();
}

fn print_help() {
    println!("Commands:");
    println!("  /open            open the country dropdown");
    println!("  /close           close the country dropdown");
    println!("  /search <term>   filter countries by name");
    println!("  /pick <n>        select the n-th visible country");
    println!("  /submit          send the verification request");
    println!("  /quit            exit");
    println!("  anything else is treated as phone number input");
}
