/// Which side of the offer/answer exchange this link took when it was
/// created. Fixed for the life of the link, except that losing a glare
/// race demotes an offerer to answerer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkRole {
    Offerer,
    Answerer,
}

/// Negotiation progress for one peer link.
///
/// `OfferSent` and `AnswerSent` are the in-flight halves of the exchange;
/// `Connected` is only ever entered from the transport's own state
/// callback, never asserted optimistically. `Disconnected` is transient
/// (grace timer, then ICE restart); `Failed` restarts ICE too. Only an
/// explicit leave or close reaches `Closed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NegotiationState {
    New,
    OfferSent,
    AnswerSent,
    Connected,
    Disconnected,
    Failed,
    Closed,
}

impl NegotiationState {
    /// A live link keeps its transport; anything else is torn down.
    pub fn is_active(&self) -> bool {
        !matches!(self, NegotiationState::Closed)
    }

    /// Whether an inbound offer in this state is a renegotiation of an
    /// established exchange rather than the opening move.
    pub fn has_completed_exchange(&self) -> bool {
        matches!(
            self,
            NegotiationState::AnswerSent
                | NegotiationState::Connected
                | NegotiationState::Disconnected
                | NegotiationState::Failed
        )
    }
}
