//! Complication configuration screen model
//!
//! Tracks which slot the user is editing, builds provider chooser requests
//! for the host and keeps a preview per slot. The chosen providers are stored
//! by the host.

use core::fmt;

use crate::complications::{
    state::display_string, DisplayString, ImageHandle, PayloadKind, Slot,
};

/// Request code attached to provider chooser requests
pub const COMPLICATION_CONFIG_REQUEST_CODE: u32 = 1201;

/// Provider bound to a slot, as reported by the host
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ProviderInfo<'a> {
    pub name: &'a str,
    pub icon: Option<ImageHandle>,
}

/// What the configuration screen shows for a slot
#[derive(Clone, Debug, PartialEq)]
pub enum SlotPreview {
    /// No provider bound
    AddPlaceholder,
    Provider {
        name: DisplayString,
        icon: Option<ImageHandle>,
    },
}

/// Ask the host to let the user choose a provider
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ProviderChooserRequest {
    pub slot_id: i32,
    pub supported: &'static [PayloadKind],
    pub request_code: u32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// Result for an id no slot owns
    UnsupportedSlot(i32),
    /// Chooser result without a slot being edited
    NoSelection,
    /// Result for a request this screen did not send
    UnknownRequest(u32),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnsupportedSlot(id) => write!(f, "complication {} not supported", id),
            Self::NoSelection => f.write_str("no complication selected"),
            Self::UnknownRequest(code) => write!(f, "unknown request code {}", code),
        }
    }
}

pub struct ConfigSurface {
    /// Slot whose chooser is open
    selected: Option<Slot>,
    previews: [SlotPreview; 3],
}

impl Default for ConfigSurface {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigSurface {
    pub fn new() -> Self {
        Self {
            selected: None,
            previews: [
                SlotPreview::AddPlaceholder,
                SlotPreview::AddPlaceholder,
                SlotPreview::AddPlaceholder,
            ],
        }
    }

    /// Ids to fetch the currently bound providers for
    pub fn initial_request_ids(&self) -> &'static [i32] {
        crate::complications::slot_ids()
    }

    /// The user tapped `slot`; the host launches the returned request
    pub fn on_slot_clicked(&mut self, slot: Slot) -> ProviderChooserRequest {
        self.selected = Some(slot);
        ProviderChooserRequest {
            slot_id: slot.id(),
            supported: slot.supported_kinds(),
            request_code: COMPLICATION_CONFIG_REQUEST_CODE,
        }
    }

    /// Same as [`on_slot_clicked`](Self::on_slot_clicked) for a raw id
    pub fn on_slot_id_clicked(&mut self, slot_id: i32) -> Result<ProviderChooserRequest, Error> {
        match Slot::from_id(slot_id) {
            Some(slot) => Ok(self.on_slot_clicked(slot)),
            None => {
                warn!("Complication {} not supported", slot_id);
                Err(Error::UnsupportedSlot(slot_id))
            }
        }
    }

    /// Provider currently bound to `slot_id`, fetched at startup
    pub fn on_provider_info_received(
        &mut self,
        slot_id: i32,
        info: Option<&ProviderInfo<'_>>,
    ) -> Result<(), Error> {
        let slot = Slot::from_id(slot_id).ok_or(Error::UnsupportedSlot(slot_id))?;
        self.previews[index(slot)] = preview(info);
        Ok(())
    }

    /// Result of a provider chooser request
    pub fn on_provider_chosen(
        &mut self,
        request_code: u32,
        ok: bool,
        info: Option<&ProviderInfo<'_>>,
    ) -> Result<(), Error> {
        if request_code != COMPLICATION_CONFIG_REQUEST_CODE {
            return Err(Error::UnknownRequest(request_code));
        }
        if !ok {
            debug!("Provider chooser cancelled");
            return Ok(());
        }
        let slot = self.selected.ok_or(Error::NoSelection)?;
        self.previews[index(slot)] = preview(info);
        Ok(())
    }

    pub fn selected(&self) -> Option<Slot> {
        self.selected
    }

    pub fn preview(&self, slot: Slot) -> &SlotPreview {
        &self.previews[index(slot)]
    }
}

fn index(slot: Slot) -> usize {
    match slot {
        Slot::Background => 0,
        Slot::Range => 1,
        Slot::TopText => 2,
    }
}

fn preview(info: Option<&ProviderInfo<'_>>) -> SlotPreview {
    match info {
        Some(info) => SlotPreview::Provider {
            name: display_string(info.name),
            icon: info.icon,
        },
        None => SlotPreview::AddPlaceholder,
    }
}
