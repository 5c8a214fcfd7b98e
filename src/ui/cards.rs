/// Card widgets for the results and favorites grids
///
/// Each card shows a species' common and scientific names, its
/// Wikipedia thumbnail once one has been fetched, and (for
/// observations) when and where the bird was seen.
use iced::widget::{button, column, container, horizontal_space, image, row, text, Column};
use iced::{Alignment, Element, Length};

use crate::state::data::{FavoriteSpecies, Observation};
use crate::Message;

/// Card width in the wrap grid, sized for the 300px thumbnails
const CARD_WIDTH: f32 = 320.0;
/// Height reserved for the thumbnail slot
const THUMBNAIL_HEIGHT: f32 = 200.0;

/// A card for one search result.
pub fn observation_card<'a>(
    obs: &'a Observation,
    is_favorite: bool,
    thumbnail: Option<&image::Handle>,
) -> Element<'a, Message> {
    let star = if is_favorite {
        star_button("★", Message::UnfavoritePressed(obs.species_code.clone()))
    } else {
        star_button(
            "☆",
            Message::FavoritePressed {
                species_code: obs.species_code.clone(),
                com_name: obs.com_name.clone(),
                sci_name: obs.sci_name.clone(),
            },
        )
    };

    let header = row![text(&obs.com_name).size(18), horizontal_space(), star]
        .align_y(Alignment::Center);

    card(column![
        header,
        text(&obs.sci_name).size(13),
        thumbnail_slot(thumbnail),
        text(format!("Seen {}", format_observed(obs))).size(13),
        text(format!(
            "📍 {} ({:.2}, {:.2})",
            obs.loc_name, obs.lat, obs.lng
        ))
        .size(13),
    ])
}

/// A card for one starred species.
pub fn favorite_card<'a>(
    species: &'a FavoriteSpecies,
    thumbnail: Option<&image::Handle>,
) -> Element<'a, Message> {
    let star = star_button(
        "★",
        Message::UnfavoritePressed(species.species_code.clone()),
    );
    let header = row![text(&species.com_name).size(18), horizontal_space(), star]
        .align_y(Alignment::Center);

    card(column![
        header,
        text(&species.sci_name).size(13),
        thumbnail_slot(thumbnail),
    ])
}

/// Shared card chrome.
fn card(content: Column<'_, Message>) -> Element<'_, Message> {
    container(content.spacing(6))
        .padding(12)
        .width(Length::Fixed(CARD_WIDTH))
        .style(container::rounded_box)
        .into()
}

/// The thumbnail, or a placeholder box while none has resolved.
fn thumbnail_slot(thumbnail: Option<&image::Handle>) -> Element<'static, Message> {
    match thumbnail {
        Some(handle) => image(handle.clone())
            .width(Length::Fill)
            .height(Length::Fixed(THUMBNAIL_HEIGHT))
            .into(),
        None => container(text("no photo yet").size(13))
            .width(Length::Fill)
            .height(Length::Fixed(THUMBNAIL_HEIGHT))
            .center_x(Length::Fill)
            .center_y(Length::Fill)
            .into(),
    }
}

/// Star toggle in the card header.
fn star_button(label: &'static str, message: Message) -> Element<'static, Message> {
    button(text(label)).on_press(message).padding(4).into()
}

/// "May 1, 09:12" when the timestamp parses, otherwise eBird's raw
/// string (some checklists are date-only).
fn format_observed(obs: &Observation) -> String {
    obs.observed_at()
        .map(|dt| dt.format("%b %-d, %H:%M").to_string())
        .unwrap_or_else(|| obs.obs_dt.clone())
}
