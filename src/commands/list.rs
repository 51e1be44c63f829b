use std::io::Write;

use anyhow::Context;
use oncall_report::api::Directory;

pub async fn schedules<D: Directory, W: Write>(directory: &D, out: &mut W) -> anyhow::Result<()> {
    let schedules = directory.list_schedules().await.context("failed to fetch schedule list")?;

    writeln!(out, "==== Found {} schedule(s) ====", schedules.len())?;
    for schedule in schedules {
        writeln!(
            out,
            "[{}] {:<20}, Timezone: {}",
            schedule.id, schedule.name, schedule.time_zone
        )?;
    }
    Ok(())
}

pub async fn users<D: Directory, W: Write>(directory: &D, out: &mut W) -> anyhow::Result<()> {
    let users = directory.list_users().await.context("failed to fetch user list")?;

    writeln!(out, "==== Found {} user(s) ====", users.len())?;
    for user in users {
        let teams: Vec<&str> = user.teams.iter().map(|t| t.id.as_str()).collect();
        writeln!(
            out,
            "[{}] {:<30} {:<40} in teams: {}",
            user.id,
            user.name,
            format!("<{}>", user.email),
            teams.join(" ")
        )?;
    }
    Ok(())
}

pub async fn teams<D: Directory, W: Write>(directory: &D, out: &mut W) -> anyhow::Result<()> {
    let teams = directory.list_teams().await.context("failed to fetch team list")?;

    writeln!(out, "==== Found {} team(s) ====", teams.len())?;
    for team in teams {
        writeln!(out, "[{}] {:<20}", team.id, team.name)?;
    }
    Ok(())
}

pub async fn services<D: Directory, W: Write>(
    directory: &D,
    team_id: &str,
    out: &mut W,
) -> anyhow::Result<()> {
    let services = directory
        .list_services(team_id)
        .await
        .with_context(|| format!("failed to fetch services of team {}", team_id))?;

    writeln!(
        out,
        "==== Found {} service(s) for the team {} ====",
        services.len(),
        team_id
    )?;
    for service in services {
        writeln!(out, "[{}] {:<20}", service.id, service.name)?;
    }
    Ok(())
}
