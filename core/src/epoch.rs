use crate::Link;

/// Protocol upgrade epochs. An account's epoch is raised by a dedicated
/// epoch block whose link is one of the reserved epoch links.
#[repr(u8)]
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
pub enum Epoch {
    #[default]
    Epoch0 = 0,
    Epoch1 = 1,
    Epoch2 = 2,
}

pub fn epoch_v1_link() -> Link {
    let mut link_bytes = [0u8; 32];
    link_bytes[..14].copy_from_slice(b"epoch v1 block");
    Link::from_bytes(link_bytes)
}

pub fn epoch_v2_link() -> Link {
    let mut link_bytes = [0u8; 32];
    link_bytes[..14].copy_from_slice(b"epoch v2 block");
    Link::from_bytes(link_bytes)
}

/// Registry of the epoch link sentinels for a network.
#[derive(Default, Clone)]
pub struct Epochs {
    epochs: Vec<(Epoch, Link)>,
}

impl Epochs {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn add(&mut self, epoch: Epoch, link: Link) {
        self.epochs.push((epoch, link));
    }

    pub fn is_epoch_link(&self, link: &Link) -> bool {
        self.epochs.iter().any(|(_, l)| l == link)
    }

    pub fn link(&self, epoch: Epoch) -> Option<&Link> {
        self.epochs
            .iter()
            .find(|(e, _)| *e == epoch)
            .map(|(_, link)| link)
    }

    pub fn epoch(&self, link: &Link) -> Option<Epoch> {
        self.epochs
            .iter()
            .find(|(_, l)| l == link)
            .map(|(epoch, _)| *epoch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn epoch_link_registry() {
        let mut epochs = Epochs::new();
        epochs.add(Epoch::Epoch1, epoch_v1_link());
        epochs.add(Epoch::Epoch2, epoch_v2_link());

        assert!(epochs.is_epoch_link(&epoch_v1_link()));
        assert!(epochs.is_epoch_link(&epoch_v2_link()));
        assert!(!epochs.is_epoch_link(&Link::from(42)));
        assert_eq!(epochs.epoch(&epoch_v2_link()), Some(Epoch::Epoch2));
        assert_eq!(epochs.link(Epoch::Epoch1), Some(&epoch_v1_link()));
    }
}
