//! Plain-text rendering of the lookup view state.

use lookup_core::LookupState;
use shared::domain::Profile;

const PLACEHOLDER: &str = "░░░░░░░░";
const STAT_LABELS: [&str; 3] = ["Public Repos", "Followers", "Following"];

pub fn render_state(state: &LookupState) -> String {
    if state.loading {
        return render_placeholder(&state.username);
    }
    if let Some(error) = &state.error {
        return format!("error: {error}");
    }
    match &state.profile {
        Some(profile) => render_profile(profile),
        None => String::new(),
    }
}

pub fn render_placeholder(username: &str) -> String {
    let mut out = format!("Looking up \"{username}\"...\n");
    out.push_str(&format!("  {PLACEHOLDER}\n"));
    for label in STAT_LABELS {
        out.push_str(&format!("  {label:<14}{PLACEHOLDER}\n"));
    }
    out
}

pub fn render_profile(profile: &Profile) -> String {
    let mut out = String::new();
    if profile.display_label() == profile.login {
        out.push_str(&format!("{}\n", profile.login));
    } else {
        out.push_str(&format!("{} (@{})\n", profile.display_label(), profile.login));
    }
    out.push_str(&format!("  {}\n", profile.profile_url));
    if let Some(bio) = &profile.bio {
        out.push_str(&format!("  {bio}\n"));
    }
    if let Some(location) = &profile.location {
        out.push_str(&format!("  Location: {location}\n"));
    }

    let counts = [
        profile.public_repo_count,
        profile.follower_count,
        profile.following_count,
    ];
    for (label, count) in STAT_LABELS.iter().zip(counts) {
        out.push_str(&format!("  {label:<14}{count}\n"));
    }

    if let Some(created_at) = profile.created_at {
        out.push_str(&format!("  Member since  {}\n", created_at.format("%Y-%m-%d")));
    }
    out.push_str(&format!("  Avatar        {}\n", profile.avatar_url));
    out
}
