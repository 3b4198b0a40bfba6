//! Embed paginator built on [`Menu`].
//!
//! Shows one embed at a time with first/previous/next/last buttons. Page
//! movement wraps around at both ends.

use crate::{
    core::{
        auth::AllowedActors,
        events::EventSource,
        interaction::{ButtonDescriptor, ButtonStyle, Embed, MessageRef, Reply},
        menu::{Menu, MenuButton, MenuHandle, MenuOptions, MenuPress},
        platform::Platform,
    },
    errors::{Error, Result},
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// How a button moves through the pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Step {
    First,
    Previous,
    Next,
    Last,
}

impl Step {
    fn apply(self, current: usize, pages: usize) -> usize {
        match self {
            Self::First => 0,
            Self::Previous => current.checked_sub(1).unwrap_or(pages - 1),
            Self::Next => (current + 1) % pages,
            Self::Last => pages - 1,
        }
    }
}

/// Paginator settings.
#[derive(Debug, Clone)]
pub struct PaginatorOptions {
    /// Page shown first
    pub starting_page: usize,
    /// Who may flip pages
    pub allowed_actors: AllowedActors,
    /// Inactivity window
    pub inactivity: Duration,
}

/// Shared page cursor of one paginator.
struct Pages {
    embeds: Vec<Embed>,
    current: AtomicUsize,
}

impl Pages {
    fn reply(&self, index: usize) -> Reply {
        let mut embed = self.embeds[index].clone();
        embed.title = format!("{} ({}/{})", embed.title, index + 1, self.embeds.len());
        Reply::embed(embed)
    }

    async fn step(&self, step: Step, menu: &MenuHandle) -> Result<()> {
        let pages = self.embeds.len();
        let mut next = 0;
        self.current
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |current| {
                next = step.apply(current, pages);
                Some(next)
            })
            .ok();
        menu.edit(self.reply(next)).await
    }
}

/// Entry point for paginated menus.
pub struct Paginator;

impl Paginator {
    /// Turns `message` into a paginated view over `embeds`.
    pub async fn attach(
        platform: Arc<dyn Platform>,
        events: &EventSource,
        message: MessageRef,
        embeds: Vec<Embed>,
        options: PaginatorOptions,
    ) -> Result<MenuHandle> {
        if embeds.is_empty() {
            return Err(Error::Config {
                message: "A paginator needs at least one page".to_string(),
            });
        }
        let starting_page = options.starting_page.min(embeds.len() - 1);
        let pages = Arc::new(Pages {
            embeds,
            current: AtomicUsize::new(starting_page),
        });

        let buttons = [
            (Step::First, "first", "First"),
            (Step::Previous, "prev", "Previous"),
            (Step::Next, "next", "Next"),
            (Step::Last, "last", "Last"),
        ]
        .into_iter()
        .map(|(step, id, label)| {
            let pages = Arc::clone(&pages);
            MenuButton::new(
                ButtonDescriptor::new(id, label).style(ButtonStyle::Secondary),
                move |press: MenuPress| {
                    let pages = Arc::clone(&pages);
                    async move { pages.step(step, &press.menu).await }
                },
            )
        })
        .collect();

        Menu::attach(
            platform,
            events,
            message,
            pages.reply(starting_page),
            buttons,
            MenuOptions::new(options.allowed_actors).inactivity(options.inactivity),
        )
        .await
    }
}
