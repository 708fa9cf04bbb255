use crate::cli::FeedbackArgs;
use crate::feedback::{FeedbackClient, FeedbackData};
use anyhow::{Context, Result};
use inquire::validator::Validation;
use inquire::{CustomUserError, Text};

/// Handle the `feedback` command.
pub(crate) async fn handle_feedback_command(args: FeedbackArgs) -> Result<()> {
    let client = match &args.api_url {
        Some(url) => FeedbackClient::with_url(Some(url.clone())),
        None => FeedbackClient::from_env(),
    };
    let data = if args.skill.is_some() && args.issue.is_some() {
        feedback_from_args(args)
    } else {
        prompt_feedback(args)?
    };

    let Some(url) = client.api_url() else {
        println!("Feedback API not configured.");
        println!("Please set the FEEDBACK_API_URL environment variable.");
        return Ok(());
    };
    println!("Sending feedback to {url}...");
    if client.submit(&data).await {
        println!("Feedback has been sent successfully!");
    } else {
        println!("Failed to send feedback.");
        println!("Please check that the Feedback API is reachable: {url}");
    }
    Ok(())
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn feedback_from_args(args: FeedbackArgs) -> FeedbackData {
    FeedbackData {
        skill: args.skill.unwrap_or_default(),
        issue: args.issue.unwrap_or_default(),
        context: non_blank(args.context),
        model: non_blank(args.model),
        suggestion: non_blank(args.suggestion),
        skill_instruction: non_blank(args.skill_instruction),
        actual_action: non_blank(args.actual_action),
        decision_reason: non_blank(args.decision_reason),
        loaded_skills: non_blank(args.loaded_skills),
    }
}

fn required(message: &str, error: &'static str) -> Result<String> {
    Text::new(message)
        .with_validator(move |input: &str| {
            Ok::<_, CustomUserError>(if input.trim().is_empty() {
                Validation::Invalid(error.into())
            } else {
                Validation::Valid
            })
        })
        .prompt()
        .context("Failed to read feedback")
}

fn optional(current: Option<String>, message: &str) -> Result<Option<String>> {
    if current.is_some() {
        return Ok(current);
    }
    let answer = Text::new(message)
        .prompt_skippable()
        .context("Failed to read feedback")?;
    Ok(non_blank(answer))
}

/// Asks for everything the flags did not provide.
fn prompt_feedback(mut args: FeedbackArgs) -> Result<FeedbackData> {
    if args.skill.is_none() {
        let skill = required(
            "Which skill ID has the issue? (e.g., flutter/bloc-state-management)",
            "Skill ID is required",
        )?;
        args.skill = Some(skill);
    }
    if args.issue.is_none() {
        let issue = required(
            "What is the issue? (Brief description)",
            "Issue description is required",
        )?;
        args.issue = Some(issue);
    }
    args.model = optional(args.model, "AI Model name (optional)")?;
    args.context = optional(
        args.context,
        "Any extra context? (optional, e.g., framework versions)",
    )?;
    args.suggestion = optional(args.suggestion, "Any suggested improvement? (optional)")?;
    args.skill_instruction = optional(
        args.skill_instruction,
        "Exact quote from the skill (optional)",
    )?;
    args.actual_action = optional(args.actual_action, "What you did instead (optional)")?;
    args.decision_reason = optional(
        args.decision_reason,
        "Why you chose this approach (optional)",
    )?;
    args.loaded_skills = optional(args.loaded_skills, "All active skills (optional)")?;
    Ok(feedback_from_args(args))
}
