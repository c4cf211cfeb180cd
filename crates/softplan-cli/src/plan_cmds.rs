//! CLI handlers for `softplan plan` subcommands.
//!
//! Implements:
//! - `softplan plan list`                 -- table of your plans
//! - `softplan plan show <plan-id>`       -- details of one plan
//! - `softplan plan create --activity ..` -- validate, store, and open its chat
//! - `softplan plan edit <plan-id> ..`    -- change fields, keep the rest
//! - `softplan plan delete <plan-id>`     -- two-step delete (needs `--yes`)
//! - `softplan plan rsvp <plan-id> <r>`   -- bump a response counter

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};

use softplan_core::plan::draft::parse_time_of_day;
use softplan_core::plan::{ExpiryPolicy, PlanDraft, PlanService, TimeOption};
use softplan_core::rsvp::{RsvpResponse, RsvpTally};
use softplan_db::models::{Audience, MoodTag, Plan};

use crate::{App, PlanCommands, PlanFields};

// -----------------------------------------------------------------------
// Public entry point
// -----------------------------------------------------------------------

/// Dispatch a `PlanCommands` variant to the appropriate handler.
pub async fn run_plan_command(command: PlanCommands, app: &App) -> Result<()> {
    let service = PlanService::new(app.storage.clone(), app.clock.clone(), app.me.clone());
    let today = app.clock.now().with_timezone(&Local).date_naive();

    match command {
        PlanCommands::List => cmd_list(&service).await,
        PlanCommands::Show { plan_id } => cmd_show(&service, &plan_id).await,
        PlanCommands::Create {
            fields,
            audience,
            expires_at,
        } => cmd_create(&service, fields, audience, expires_at.as_deref(), today).await,
        PlanCommands::Edit { plan_id, fields } => {
            cmd_edit(&service, &plan_id, fields, today).await
        }
        PlanCommands::Delete { plan_id, yes } => cmd_delete(&service, &plan_id, yes).await,
        PlanCommands::Rsvp { plan_id, response } => {
            cmd_rsvp(&service, &plan_id, response).await
        }
    }
}

// -----------------------------------------------------------------------
// Argument parsing
// -----------------------------------------------------------------------

/// Parse `YYYY-MM-DD`, `today` or `tomorrow` relative to `today`.
fn parse_date(raw: &str, today: NaiveDate) -> Result<NaiveDate> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "today" => Ok(today),
        "tomorrow" => today
            .succ_opt()
            .context("no calendar date after today"),
        other => NaiveDate::parse_from_str(other, "%Y-%m-%d")
            .with_context(|| format!("invalid date {raw:?}: expected YYYY-MM-DD, today or tomorrow")),
    }
}

fn parse_moods(raw: &[String]) -> Vec<MoodTag> {
    raw.iter()
        .map(|m| m.trim())
        .filter(|m| !m.is_empty())
        .map(MoodTag::parse)
        .collect()
}

/// Turn the form fields into a draft. Missing fields stay empty and are
/// reported by validation.
fn draft_from_fields(fields: PlanFields, today: NaiveDate) -> Result<PlanDraft> {
    let date = fields
        .date
        .as_deref()
        .map(|d| parse_date(d, today))
        .transpose()?;
    Ok(PlanDraft {
        activity: fields.activity.unwrap_or_default(),
        description: fields.description.unwrap_or_default(),
        date,
        time: fields.time.map(|t| TimeOption::from(t.as_str())),
        location: fields.location.unwrap_or_default(),
        mood: parse_moods(&fields.mood),
        ..PlanDraft::default()
    })
}

/// Overlay the fields that were given on top of an existing plan.
fn merge_into_plan(plan: &Plan, fields: PlanFields, today: NaiveDate) -> Result<PlanDraft> {
    let date = match fields.date.as_deref() {
        Some(raw) => parse_date(raw, today)?,
        None => plan.date,
    };
    let mood = if fields.mood.is_empty() {
        plan.mood.clone()
    } else {
        parse_moods(&fields.mood)
    };
    Ok(PlanDraft {
        activity: fields.activity.unwrap_or_else(|| plan.activity.clone()),
        description: fields
            .description
            .unwrap_or_else(|| plan.description.clone()),
        date: Some(date),
        time: Some(TimeOption::from(
            fields.time.as_deref().unwrap_or(plan.time.as_str()),
        )),
        location: fields.location.unwrap_or_else(|| plan.location.clone()),
        mood,
        audience: plan.audience,
        expiry: ExpiryPolicy::default(),
    })
}

// -----------------------------------------------------------------------
// softplan plan list
// -----------------------------------------------------------------------

async fn cmd_list(service: &PlanService) -> Result<()> {
    let plans = service.list().await?;

    if plans.is_empty() {
        println!("No plans yet. Use `softplan plan create` to make one.");
        return Ok(());
    }

    let id_w = plans.iter().map(|p| p.id.len()).max().unwrap_or(2).max(2);
    let activity_w = plans
        .iter()
        .map(|p| p.activity.chars().count())
        .max()
        .unwrap_or(8)
        .max(8);
    let time_w = 8;

    println!(
        "{:<id_w$}  {:<activity_w$}  {:<10}  {:<time_w$}  RSVPS",
        "ID", "ACTIVITY", "DATE", "TIME",
    );
    for plan in &plans {
        println!(
            "{:<id_w$}  {:<activity_w$}  {:<10}  {:<time_w$}  {}",
            plan.id,
            plan.activity,
            plan.date.format("%Y-%m-%d"),
            plan.time,
            plan.rsvps.summary(),
        );
    }

    Ok(())
}

// -----------------------------------------------------------------------
// softplan plan show <plan-id>
// -----------------------------------------------------------------------

async fn cmd_show(service: &PlanService, plan_id: &str) -> Result<()> {
    let plan = service.get(plan_id).await?;
    print_plan(&plan);
    Ok(())
}

fn print_plan(plan: &Plan) {
    println!("Plan: {}", plan.activity);
    println!("  ID:        {}", plan.id);
    println!("  When:      {} at {}", plan.date.format("%a, %b %-d %Y"), plan.time);
    if !plan.location.is_empty() {
        println!("  Where:     {}", plan.location);
    }
    if !plan.description.is_empty() {
        println!("  About:     {}", plan.description);
    }
    if !plan.mood.is_empty() {
        let moods: Vec<String> = plan.mood.iter().map(ToString::to_string).collect();
        println!("  Mood:      {}", moods.join("  "));
    }
    println!("  Audience:  {}", plan.audience);
    println!("  RSVPs:     {}", plan.rsvps.summary());
    if let Some(created) = plan.created_at {
        println!(
            "  Created:   {}",
            created.with_timezone(&Local).format("%Y-%m-%d %H:%M")
        );
    }
}

// -----------------------------------------------------------------------
// softplan plan create
// -----------------------------------------------------------------------

async fn cmd_create(
    service: &PlanService,
    fields: PlanFields,
    audience: Audience,
    expires_at: Option<&str>,
    today: NaiveDate,
) -> Result<()> {
    let expiry = match expires_at {
        Some(raw) => ExpiryPolicy::At(
            parse_time_of_day(raw)
                .with_context(|| format!("invalid expiry time {raw:?}: expected e.g. 10:30 PM"))?,
        ),
        None => ExpiryPolicy::AfterStart,
    };
    let draft = PlanDraft {
        audience,
        expiry,
        ..draft_from_fields(fields, today)?
    };

    let plan = service.create(draft).await?;

    println!("Plan created. Its chat is open as {}.", plan.id);
    println!();
    print_plan(&plan);
    Ok(())
}

// -----------------------------------------------------------------------
// softplan plan edit <plan-id>
// -----------------------------------------------------------------------

async fn cmd_edit(
    service: &PlanService,
    plan_id: &str,
    fields: PlanFields,
    today: NaiveDate,
) -> Result<()> {
    let current = service.get(plan_id).await?;
    let patch = merge_into_plan(&current, fields, today)?;
    let plan = service.update(plan_id, patch).await?;

    println!("Plan updated.");
    println!();
    print_plan(&plan);
    Ok(())
}

// -----------------------------------------------------------------------
// softplan plan delete <plan-id>
// -----------------------------------------------------------------------

async fn cmd_delete(service: &PlanService, plan_id: &str, yes: bool) -> Result<()> {
    let request = service.request_delete(plan_id).await?;

    if !yes {
        println!(
            "This will delete \"{}\" and its chat. Re-run with --yes to confirm.",
            request.activity()
        );
        return Ok(());
    }

    let removed = service.confirm_delete(request).await?;
    println!("Deleted \"{}\" ({}).", removed.activity, removed.id);
    Ok(())
}

// -----------------------------------------------------------------------
// softplan plan rsvp <plan-id> <response>
// -----------------------------------------------------------------------

async fn cmd_rsvp(service: &PlanService, plan_id: &str, response: RsvpResponse) -> Result<()> {
    let plan = service.record_rsvp(plan_id, response).await?;
    println!("Recorded {response} for \"{}\": {}", plan.activity, plan.rsvps.summary());
    Ok(())
}

// -----------------------------------------------------------------------
// Tests
// -----------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use softplan_db::models::PresetMood;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
    }

    #[test]
    fn parse_date_accepts_relative_words() {
        assert_eq!(parse_date("today", today()).unwrap(), today());
        assert_eq!(
            parse_date("Tomorrow", today()).unwrap(),
            NaiveDate::from_ymd_opt(2024, 6, 2).unwrap()
        );
        assert_eq!(
            parse_date("2024-12-24", today()).unwrap(),
            NaiveDate::from_ymd_opt(2024, 12, 24).unwrap()
        );
    }

    #[test]
    fn parse_date_rejects_other_formats() {
        let err = parse_date("24/12/2024", today()).unwrap_err();
        assert!(err.to_string().contains("expected YYYY-MM-DD"));
    }

    #[test]
    fn draft_from_fields_leaves_missing_fields_for_validation() {
        let draft = draft_from_fields(PlanFields::default(), today()).unwrap();
        assert!(draft.activity.is_empty());
        assert!(draft.date.is_none());
        assert!(draft.time.is_none());
        assert!(draft.mood.is_empty());
    }

    #[test]
    fn draft_from_fields_parses_moods_and_time() {
        let fields = PlanFields {
            activity: Some("Picnic".into()),
            date: Some("today".into()),
            time: Some("evening".into()),
            mood: vec!["chill".into(), " ".into(), "stargazing".into()],
            ..PlanFields::default()
        };
        let draft = draft_from_fields(fields, today()).unwrap();
        assert_eq!(draft.time, Some(TimeOption::Evening));
        assert_eq!(
            draft.mood,
            vec![MoodTag::preset(PresetMood::Chill), MoodTag::custom("stargazing")]
        );
    }

    #[test]
    fn merge_keeps_unspecified_fields() {
        let plan = Plan {
            id: "p1".into(),
            activity: "Board games".into(),
            description: "Bring snacks".into(),
            date: today(),
            time: "7:00 PM".into(),
            location: "My place".into(),
            mood: vec![MoodTag::preset(PresetMood::Chill)],
            rsvps: Default::default(),
            audience: Audience::Public,
            created_at: None,
        };
        let fields = PlanFields {
            location: Some("Cafe".into()),
            ..PlanFields::default()
        };
        let draft = merge_into_plan(&plan, fields, today()).unwrap();
        assert_eq!(draft.activity, "Board games");
        assert_eq!(draft.location, "Cafe");
        assert_eq!(draft.date, Some(today()));
        assert_eq!(draft.time, Some(TimeOption::Custom("7:00 PM".into())));
        assert_eq!(draft.mood, plan.mood);
        assert_eq!(draft.audience, Audience::Public);
    }
}
