//! Profile side panel and connection status readout.

use leptos::prelude::*;

use crate::feed::{ConnectionStatus, Participant};

/// Shows the selected participant's profile, or a hint when nothing is selected.
#[component]
pub fn SidePanel(
	#[prop(into)] selected: Signal<Option<Participant>>,
	#[prop(into)] on_close: Callback<()>,
) -> impl IntoView {
	let title = move || {
		selected.with(|s| {
			s.as_ref()
				.map(|p| p.name.clone())
				.unwrap_or_else(|| "Select a User".to_string())
		})
	};

	view! {
		<aside class="sidebar">
			<h2 class="sidebar-title">{title}</h2>
			{move || match selected.get() {
				Some(participant) => {
					view! { <ProfileDetails participant=participant on_close=on_close /> }
						.into_any()
				}
				None => view! { <p class="text">"Click on a user to view details."</p> }.into_any(),
			}}
		</aside>
	}
}

#[component]
fn ProfileDetails(participant: Participant, on_close: Callback<()>) -> impl IntoView {
	let role = participant
		.role
		.as_ref()
		.map(|r| r.as_str().to_uppercase())
		.unwrap_or_default();
	let profile = participant.profile.unwrap_or_default();
	let github = profile.github.map(|url| {
		view! {
			<a href=url target="_blank" rel="noopener noreferrer" class="profile-link">
				"GitHub →"
			</a>
		}
	});
	let skills = (!profile.skills.is_empty()).then(|| {
		view! {
			<ul class="skills">
				{profile.skills.into_iter().map(|s| view! { <li>{s}</li> }).collect_view()}
			</ul>
		}
	});

	view! {
		<p class="text">
			<strong>"Role: "</strong>
			{role}
		</p>
		{github}
		{skills}
		<button class="close-button" on:click=move |_| on_close.run(())>
			"✖ Close"
		</button>
	}
}

/// The single user-visible failure indicator.
#[component]
pub fn StatusBox(#[prop(into)] status: Signal<ConnectionStatus>) -> impl IntoView {
	view! {
		<div class="status-box">
			<span class="status-title">"Connection Status: "</span>
			{move || status.get().label()}
		</div>
	}
}
