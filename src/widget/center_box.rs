use tracing::trace;

use super::native::{NativeBox, Orientation, Slot};

/// Construction properties for [`CenterBox::new`].
#[derive(Debug)]
pub struct CenterBoxProps<C> {
    pub vertical: bool,
    pub start_widget: Option<C>,
    pub center_widget: Option<C>,
    pub end_widget: Option<C>,
}

impl<C> Default for CenterBoxProps<C> {
    fn default() -> Self {
        Self {
            vertical: false,
            start_widget: None,
            center_widget: None,
            end_widget: None,
        }
    }
}

/// A box with three independently settable children: start, center and end.
///
/// Start and end children are owned by the container. Replacing or clearing
/// one destroys the previous occupant, even when the new value is the same
/// handle. The center child lives in the native box's dedicated center
/// position and is read back from it.
#[derive(Debug)]
pub struct CenterBox<N: NativeBox> {
    native: N,
    start: Option<N::Child>,
    end: Option<N::Child>,
}

impl<N: NativeBox> CenterBox<N> {
    /// Wrap `native` and apply `props` through the regular setters, in
    /// start, center, end order.
    ///
    /// # Errors
    ///
    /// Returns the native box's error if orientation or packing fails.
    pub fn new(native: N, props: CenterBoxProps<N::Child>) -> Result<Self, N::Error> {
        let mut center_box = Self {
            native,
            start: None,
            end: None,
        };
        if props.vertical {
            center_box.native.set_orientation(Orientation::Vertical)?;
        }
        if let Some(child) = props.start_widget {
            center_box.set_start_widget(Some(child))?;
        }
        if let Some(child) = props.center_widget {
            center_box.set_center_widget(Some(child))?;
        }
        if let Some(child) = props.end_widget {
            center_box.set_end_widget(Some(child))?;
        }
        Ok(center_box)
    }

    pub const fn native(&self) -> &N {
        &self.native
    }

    pub const fn start_widget(&self) -> Option<&N::Child> {
        self.start.as_ref()
    }

    /// # Errors
    ///
    /// Propagates destroy, pack and show failures from the native box.
    pub fn set_start_widget(&mut self, child: Option<N::Child>) -> Result<(), N::Error> {
        self.replace_edge(Edge::Start, child)
    }

    pub const fn end_widget(&self) -> Option<&N::Child> {
        self.end.as_ref()
    }

    /// # Errors
    ///
    /// Propagates destroy, pack and show failures from the native box.
    pub fn set_end_widget(&mut self, child: Option<N::Child>) -> Result<(), N::Error> {
        self.replace_edge(Edge::End, child)
    }

    pub fn center_widget(&self) -> Option<N::Child> {
        self.native.center_widget()
    }

    /// Clearing an occupied center destroys the occupant and skips the
    /// native setter and the change notification.
    ///
    /// # Errors
    ///
    /// Propagates destroy and set-center failures from the native box.
    pub fn set_center_widget(&mut self, child: Option<N::Child>) -> Result<(), N::Error> {
        if child.is_none() {
            if let Some(current) = self.native.center_widget() {
                trace!(slot = %Slot::Center, ?current, "destroying center widget");
                return self.native.destroy(&current);
            }
        }

        self.native.set_center_widget(child.as_ref())?;
        self.native.notify(Slot::Center);
        Ok(())
    }

    pub fn get(&self, slot: Slot) -> Option<N::Child> {
        match slot {
            Slot::Start => self.start.clone(),
            Slot::Center => self.center_widget(),
            Slot::End => self.end.clone(),
        }
    }

    /// # Errors
    ///
    /// Propagates failures from the slot's setter.
    pub fn set(&mut self, slot: Slot, child: Option<N::Child>) -> Result<(), N::Error> {
        match slot {
            Slot::Start => self.set_start_widget(child),
            Slot::Center => self.set_center_widget(child),
            Slot::End => self.set_end_widget(child),
        }
    }

    /// Assign children positionally to start, center and end.
    ///
    /// Empty or missing positions leave their slot untouched and items past
    /// the third are ignored. Handles that end up in no slot are not
    /// destroyed here.
    ///
    /// # Errors
    ///
    /// Stops at the first failing setter and returns its error.
    pub fn set_children<I>(&mut self, children: I) -> Result<(), N::Error>
    where
        I: IntoIterator,
        I::Item: Into<Option<N::Child>>,
    {
        for (slot, child) in Slot::ALL.into_iter().zip(children) {
            if let Some(child) = child.into() {
                self.set(slot, Some(child))?;
            }
        }
        Ok(())
    }

    /// Empty every slot, destroying the occupants.
    ///
    /// # Errors
    ///
    /// Stops at the first failing setter and returns its error.
    pub fn clear(&mut self) -> Result<(), N::Error> {
        for slot in Slot::ALL {
            self.set(slot, None)?;
        }
        Ok(())
    }

    /// Tear the container down and hand the native box back.
    ///
    /// # Errors
    ///
    /// Returns the first native failure hit while clearing.
    pub fn destroy(mut self) -> Result<N, N::Error> {
        self.clear()?;
        Ok(self.native)
    }

    fn replace_edge(&mut self, edge: Edge, child: Option<N::Child>) -> Result<(), N::Error> {
        let slot = edge.slot();
        let stored = match edge {
            Edge::Start => &mut self.start,
            Edge::End => &mut self.end,
        };
        // The slot keeps its occupant until the destroy succeeds.
        if let Some(previous) = stored.as_ref() {
            trace!(%slot, ?previous, "destroying displaced widget");
            self.native.destroy(previous)?;
        }
        stored.clone_from(&child);
        self.native.notify(slot);

        let Some(child) = child else {
            return Ok(());
        };
        match edge {
            Edge::Start => self.native.pack_start(&child, true, true, 0)?,
            Edge::End => self.native.pack_end(&child, true, true, 0)?,
        }
        self.native.show_all()
    }
}

#[derive(Clone, Copy)]
enum Edge {
    Start,
    End,
}

impl Edge {
    const fn slot(self) -> Slot {
        match self {
            Self::Start => Slot::Start,
            Self::End => Slot::End,
        }
    }
}
