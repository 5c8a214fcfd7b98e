use std::collections::{HashMap, HashSet};

use iced::widget::{button, checkbox, column, image, row, scrollable, text, text_input};
use iced::{Alignment, Element, Length, Task, Theme};
use iced_aw::Wrap;

mod api;
mod state;
mod ui;

use api::ebird::EbirdClient;
use api::error::ApiError;
use api::wikipedia::WikipediaClient;
use state::data::{AppState, Observation};
use state::reducer::{reduce, Action};

/// Main application state
struct BirdWatch {
    /// The data model, only ever changed through the reducer
    data: AppState,
    /// eBird client; absent when EBIRD_API_TOKEN is not set
    ebird: Option<EbirdClient>,
    /// Wikipedia thumbnail client
    wikipedia: WikipediaClient,
    /// Latitude form field, as typed
    latitude: String,
    /// Longitude form field, as typed
    longitude: String,
    /// "notable birbs only?" toggle
    notable_only: bool,
    /// Decoded thumbnails by species code (presentation cache, never
    /// part of the data model)
    thumbnails: HashMap<String, image::Handle>,
    /// Status message to display to the user
    status: String,
}

/// Application messages (events)
#[derive(Debug, Clone)]
enum Message {
    /// User edited the latitude field
    LatitudeChanged(String),
    /// User edited the longitude field
    LongitudeChanged(String),
    /// User toggled the notable-only checkbox
    NotableToggled(bool),
    /// User pressed Search
    SearchSubmitted,
    /// The eBird query completed
    ResultsReceived(Result<Vec<Observation>, ApiError>),
    /// A Wikipedia thumbnail lookup completed for a species
    ThumbnailResolved {
        species_code: String,
        result: Result<Option<String>, ApiError>,
    },
    /// Thumbnail bytes arrived for a species
    ImageDownloaded {
        species_code: String,
        result: Result<Vec<u8>, ApiError>,
    },
    /// User starred a species from a result card
    FavoritePressed {
        species_code: String,
        com_name: String,
        sci_name: String,
    },
    /// User unstarred a species
    UnfavoritePressed(String),
}

impl BirdWatch {
    /// Create a new instance of the application
    fn new() -> (Self, Task<Message>) {
        let (ebird, status) = match EbirdClient::from_env() {
            Ok(client) => (Some(client), "Ready. Where have the birds been?".to_owned()),
            Err(error) => {
                eprintln!("⚠️  {error}");
                (None, format!("⚠️  {error}"))
            }
        };

        (
            BirdWatch {
                data: AppState::default(),
                ebird,
                wikipedia: WikipediaClient::new(),
                latitude: String::new(),
                longitude: String::new(),
                notable_only: false,
                thumbnails: HashMap::new(),
                status,
            },
            Task::none(),
        )
    }

    /// Handle application messages and update state
    fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::LatitudeChanged(value) => {
                self.latitude = value;
                Task::none()
            }
            Message::LongitudeChanged(value) => {
                self.longitude = value;
                Task::none()
            }
            Message::NotableToggled(checked) => {
                self.notable_only = checked;
                Task::none()
            }
            Message::SearchSubmitted => self.submit_search(),
            Message::ResultsReceived(Ok(results)) => self.accept_results(results),
            Message::ResultsReceived(Err(error)) => {
                eprintln!("❌ Search failed: {error}");
                self.status = format!("Search failed: {error}");
                Task::none()
            }
            Message::ThumbnailResolved {
                species_code,
                result,
            } => self.accept_thumbnail(species_code, result),
            Message::ImageDownloaded {
                species_code,
                result,
            } => {
                match result {
                    Ok(bytes) => {
                        self.thumbnails
                            .insert(species_code, image::Handle::from_bytes(bytes));
                    }
                    Err(error) => {
                        eprintln!("⚠️  Thumbnail download failed for {species_code}: {error}");
                    }
                }
                Task::none()
            }
            Message::FavoritePressed {
                species_code,
                com_name,
                sci_name,
            } => {
                self.dispatch(Action::AddFaveSpecies {
                    species_code,
                    com_name,
                    sci_name,
                });
                Task::none()
            }
            Message::UnfavoritePressed(species_code) => {
                self.dispatch(Action::RemoveFaveSpecies { species_code });
                Task::none()
            }
        }
    }

    /// Route a data mutation through the reducer. The reducer consumes
    /// the current state value and returns the next one; this is the
    /// only place the value is replaced.
    fn dispatch(&mut self, action: Action) {
        self.data = reduce(std::mem::take(&mut self.data), action);
    }

    /// Validate the form and launch the eBird query.
    fn submit_search(&mut self) -> Task<Message> {
        let lat = self.latitude.trim().to_owned();
        let lng = self.longitude.trim().to_owned();

        if lat.is_empty() || lng.is_empty() {
            self.status = "Latitude and longitude are both required.".to_owned();
            return Task::none();
        }

        let Some(ebird) = self.ebird.clone() else {
            self.status = ApiError::MissingCredentials.to_string();
            return Task::none();
        };

        self.status = format!("Searching around ({lat}, {lng})...");
        let notable_only = self.notable_only;

        Task::perform(
            async move { ebird.query_observations(&lat, &lng, notable_only).await },
            Message::ResultsReceived,
        )
    }

    /// Merge a completed search into state and kick off one thumbnail
    /// lookup per distinct species we have no image URL for yet.
    fn accept_results(&mut self, results: Vec<Observation>) -> Task<Message> {
        self.dispatch(Action::SaveResults { results });

        let count = self.data.search_results.len();
        println!("🔭 Search returned {count} observations");
        self.status = if count == 0 {
            "No birbs found.".to_owned()
        } else {
            format!("Found {count} observations.")
        };

        let mut requested: HashSet<&str> = HashSet::new();
        let mut lookups = Vec::new();
        for obs in &self.data.search_results {
            if self.data.images.contains_key(&obs.species_code) {
                continue;
            }
            if !requested.insert(obs.species_code.as_str()) {
                continue;
            }

            let wikipedia = self.wikipedia.clone();
            let species_code = obs.species_code.clone();
            let sci_name = obs.sci_name.clone();
            lookups.push(Task::perform(
                async move {
                    let result = wikipedia.fetch_thumbnail(&sci_name).await;
                    (species_code, result)
                },
                |(species_code, result)| Message::ThumbnailResolved {
                    species_code,
                    result,
                },
            ));
        }

        Task::batch(lookups)
    }

    /// Apply a finished thumbnail lookup: record the URL and fetch its
    /// bytes for display, unless this species already has a decoded
    /// image. Lookups from a superseded search land here too, which is
    /// harmless since everything is keyed by species code.
    fn accept_thumbnail(
        &mut self,
        species_code: String,
        result: Result<Option<String>, ApiError>,
    ) -> Task<Message> {
        match result {
            Ok(Some(url)) => {
                self.dispatch(Action::SaveImage {
                    species_code: species_code.clone(),
                    url: url.clone(),
                });

                if self.thumbnails.contains_key(&species_code) {
                    return Task::none();
                }

                let wikipedia = self.wikipedia.clone();
                Task::perform(
                    async move {
                        let result = wikipedia.fetch_image_bytes(&url).await;
                        (species_code, result)
                    },
                    |(species_code, result)| Message::ImageDownloaded {
                        species_code,
                        result,
                    },
                )
            }
            Ok(None) => {
                println!("🪶 No Wikipedia thumbnail for {species_code}");
                Task::none()
            }
            Err(error) => {
                eprintln!("⚠️  Thumbnail lookup failed for {species_code}: {error}");
                Task::none()
            }
        }
    }

    /// Build the user interface
    fn view(&self) -> Element<Message> {
        let form = column![
            text("Birds Birds Birds").size(40),
            text("Spot some birds?").size(20),
            row![
                text_input("latitude", &self.latitude)
                    .on_input(Message::LatitudeChanged)
                    .width(Length::Fixed(160.0)),
                text_input("longitude", &self.longitude)
                    .on_input(Message::LongitudeChanged)
                    .width(Length::Fixed(160.0)),
                checkbox("notable birbs only?", self.notable_only)
                    .on_toggle(Message::NotableToggled),
                button("Search").on_press(Message::SearchSubmitted).padding(8),
            ]
            .spacing(12)
            .align_y(Alignment::Center),
            text(&self.status).size(14),
        ]
        .spacing(12);

        let content = column![
            form,
            text("★ Favorite Species ★").size(24),
            self.favorites_grid(),
            text("Recent Nearby Observations").size(24),
            self.results_grid(),
        ]
        .spacing(16)
        .padding(24);

        scrollable(content)
            .width(Length::Fill)
            .height(Length::Fill)
            .into()
    }

    /// Card grid for starred species.
    fn favorites_grid(&self) -> Element<Message> {
        if self.data.fave_species.is_empty() {
            return text("No favorites saved.").size(14).into();
        }

        let cards = self
            .data
            .fave_species
            .iter()
            .map(|species| {
                ui::cards::favorite_card(species, self.thumbnails.get(&species.species_code))
            })
            .collect();

        Wrap::with_elements(cards)
            .spacing(12.0)
            .line_spacing(12.0)
            .into()
    }

    /// Card grid for the current search results.
    fn results_grid(&self) -> Element<Message> {
        if self.data.search_results.is_empty() {
            return text("No birbs found.").size(14).into();
        }

        let cards = self
            .data
            .search_results
            .iter()
            .map(|obs| {
                let is_favorite = self
                    .data
                    .fave_species
                    .iter()
                    .any(|species| species.species_code == obs.species_code);
                ui::cards::observation_card(
                    obs,
                    is_favorite,
                    self.thumbnails.get(&obs.species_code),
                )
            })
            .collect();

        Wrap::with_elements(cards)
            .spacing(12.0)
            .line_spacing(12.0)
            .into()
    }

    /// Set the application theme
    fn theme(&self) -> Theme {
        Theme::Dark
    }
}

fn main() -> iced::Result {
    iced::application(
        "Birds Birds Birds",
        BirdWatch::update,
        BirdWatch::view,
    )
    .theme(BirdWatch::theme)
    .centered()
    .run_with(BirdWatch::new)
}
