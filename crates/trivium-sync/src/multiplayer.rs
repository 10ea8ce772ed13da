//! Pure lobby state. No I/O here — the actor in [`session`](crate::session)
//! owns one of these and is the only thing that mutates it.

use trivium_bank::Question;
use trivium_protocol::{AnswerStatus, Member, RoomCode};
use trivium_session::Status;

/// Local view of one multiplayer lobby.
///
/// The roster is server-authoritative: every roster-bearing message
/// replaces it wholesale, in the server's order. Only the local score
/// and round bookkeeping are computed on this side.
#[derive(Debug)]
pub struct MultiplayerSession {
    code: RoomCode,
    local_name: String,
    /// Fixed at join; the server never reassigns hosting.
    is_host: bool,
    members: Vec<Member>,
    current_question: Option<Question>,
    status: Status,
    /// Local running score. Multiplayer awards full question value —
    /// the shared round timer already applies the time pressure.
    score: i32,
    has_started: bool,
    /// Starts true: before the first round the host is free to advance.
    round_over: bool,
    /// Whether the local player has resolved the current round. Guards
    /// the one-result-per-round rule.
    resolved: bool,
    finished: bool,
}

impl MultiplayerSession {
    pub fn new(code: RoomCode, local_name: impl Into<String>, is_host: bool) -> Self {
        Self {
            code,
            local_name: local_name.into(),
            is_host,
            members: Vec::new(),
            current_question: None,
            status: Status::Board,
            score: 0,
            has_started: false,
            round_over: true,
            resolved: true,
            finished: false,
        }
    }

    // -----------------------------------------------------------------------
    // Read access
    // -----------------------------------------------------------------------

    pub fn code(&self) -> RoomCode {
        self.code
    }

    pub fn local_name(&self) -> &str {
        &self.local_name
    }

    pub fn is_host(&self) -> bool {
        self.is_host
    }

    /// Roster in server order.
    pub fn members(&self) -> &[Member] {
        &self.members
    }

    pub fn current_question(&self) -> Option<&Question> {
        self.current_question.as_ref()
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn score(&self) -> i32 {
        self.score
    }

    pub fn has_started(&self) -> bool {
        self.has_started
    }

    pub fn round_over(&self) -> bool {
        self.round_over
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Whether a round is live and unresolved for the local player.
    pub fn round_live(&self) -> bool {
        !self.resolved && self.status.is_answering()
    }

    /// Whether advancing to the next round is allowed right now.
    ///
    /// Hosting is a UX gate, not a security boundary: the server
    /// enforces its own rules, this merely keeps the local player from
    /// sending requests that would be refused.
    pub fn may_progress(&self) -> bool {
        self.round_over && self.is_host && !self.finished
    }

    // -----------------------------------------------------------------------
    // Mutations (called by the actor only)
    // -----------------------------------------------------------------------

    /// Replaces the roster with the server's snapshot.
    pub(crate) fn replace_members(&mut self, members: Vec<Member>) {
        self.members = members;
    }

    /// Applies one member's round result to the roster.
    ///
    /// An unknown username is a no-op — the update likely raced a
    /// leave, and the next roster snapshot reconciles everything.
    pub(crate) fn apply_score_update(
        &mut self,
        username: &str,
        score: i32,
        status: AnswerStatus,
        answer: String,
    ) -> bool {
        match self.members.iter_mut().find(|m| m.username == username) {
            Some(member) => {
                member.score = score;
                member.status = status;
                member.answer = answer;
                true
            }
            None => false,
        }
    }

    /// Starts a round: new question, fresh roster, answering state.
    pub(crate) fn begin_round(
        &mut self,
        question: Question,
        members: Vec<Member>,
    ) {
        self.current_question = Some(question);
        self.members = members;
        self.has_started = true;
        self.round_over = false;
        self.resolved = false;
        self.status = Status::Answering;
    }

    /// Resolves the local player's round with a submitted answer.
    ///
    /// Returns the points awarded (full question value when correct).
    pub(crate) fn resolve_answer(&mut self, correct: bool) -> i32 {
        let awarded = if correct {
            self.current_question.as_ref().map_or(0, |q| q.value)
        } else {
            0
        };
        self.score += awarded;
        self.status = if correct {
            Status::Correct
        } else {
            Status::Incorrect
        };
        self.resolved = true;
        awarded
    }

    /// Resolves the round as timed out.
    ///
    /// Also forces `round_over` locally: with our result in, the server
    /// will declare the round over momentarily, and the UI should not
    /// sit in a dead answering screen waiting for it.
    pub(crate) fn resolve_timeout(&mut self) {
        self.status = Status::TimedOut;
        self.resolved = true;
        self.round_over = true;
    }

    /// Marks the round over (server declared it).
    pub(crate) fn mark_round_over(&mut self) {
        self.round_over = true;
    }

    /// Enters the terminal state. Nothing un-finishes a game.
    pub(crate) fn mark_finished(&mut self) {
        self.finished = true;
        self.round_over = true;
        self.status = Status::Reward;
    }
}

// =========================================================================
// Tests
// =========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn code() -> RoomCode {
        RoomCode::parse("12345").unwrap()
    }

    fn member(name: &str, score: i32) -> Member {
        Member {
            score,
            ..Member::new(name)
        }
    }

    fn question(value: i32) -> Question {
        Question {
            id: 1,
            prompt: "Capital of New Zealand?".into(),
            answers: vec!["Wellington".into()],
            value,
            difficulty: 3,
            answered: false,
        }
    }

    // =====================================================================
    // Fresh lobby
    // =====================================================================

    #[test]
    fn test_new_lobby_host_may_progress_immediately() {
        // round_over starts true so the host can kick off round one.
        let lobby = MultiplayerSession::new(code(), "ada", true);
        assert!(lobby.may_progress());
        assert!(!lobby.has_started());
    }

    #[test]
    fn test_new_lobby_guest_may_never_progress() {
        let lobby = MultiplayerSession::new(code(), "grace", false);
        assert!(!lobby.may_progress());
    }

    // =====================================================================
    // Rounds
    // =====================================================================

    #[test]
    fn test_begin_round_locks_progress_until_round_over() {
        let mut lobby = MultiplayerSession::new(code(), "ada", true);
        lobby.begin_round(question(300), vec![member("ada", 0)]);

        assert!(lobby.round_live());
        assert!(!lobby.may_progress());
        assert_eq!(lobby.status(), Status::Answering);

        lobby.resolve_answer(true);
        assert!(!lobby.round_live());
        // Our answer alone does not end the round.
        assert!(!lobby.may_progress());

        lobby.mark_round_over();
        assert!(lobby.may_progress());
    }

    #[test]
    fn test_resolve_answer_correct_awards_full_value() {
        let mut lobby = MultiplayerSession::new(code(), "ada", false);
        lobby.begin_round(question(300), vec![member("ada", 0)]);

        assert_eq!(lobby.resolve_answer(true), 300);
        assert_eq!(lobby.score(), 300);
        assert_eq!(lobby.status(), Status::Correct);
    }

    #[test]
    fn test_resolve_answer_wrong_awards_nothing() {
        let mut lobby = MultiplayerSession::new(code(), "ada", false);
        lobby.begin_round(question(300), vec![member("ada", 0)]);

        assert_eq!(lobby.resolve_answer(false), 0);
        assert_eq!(lobby.score(), 0);
        assert_eq!(lobby.status(), Status::Incorrect);
    }

    #[test]
    fn test_resolve_timeout_forces_round_over_locally() {
        let mut lobby = MultiplayerSession::new(code(), "ada", true);
        lobby.begin_round(question(300), vec![member("ada", 0)]);

        lobby.resolve_timeout();

        assert_eq!(lobby.status(), Status::TimedOut);
        assert!(lobby.round_over());
        assert!(lobby.may_progress());
    }

    // =====================================================================
    // Roster
    // =====================================================================

    #[test]
    fn test_roster_replaced_in_server_order() {
        let mut lobby = MultiplayerSession::new(code(), "ada", false);
        lobby.replace_members(vec![member("grace", 0), member("ada", 0)]);

        let names: Vec<_> =
            lobby.members().iter().map(|m| m.username.as_str()).collect();
        assert_eq!(names, vec!["grace", "ada"]);
    }

    #[test]
    fn test_apply_score_update_known_member() {
        let mut lobby = MultiplayerSession::new(code(), "ada", false);
        lobby.replace_members(vec![member("ada", 0), member("grace", 0)]);

        let applied = lobby.apply_score_update(
            "grace",
            450,
            AnswerStatus::Correct,
            "wellington".into(),
        );

        assert!(applied);
        assert_eq!(lobby.members()[1].score, 450);
        assert_eq!(lobby.members()[1].status, AnswerStatus::Correct);
    }

    #[test]
    fn test_apply_score_update_unknown_member_is_noop() {
        let mut lobby = MultiplayerSession::new(code(), "ada", false);
        lobby.replace_members(vec![member("ada", 100)]);

        let applied = lobby.apply_score_update(
            "nobody",
            999,
            AnswerStatus::Correct,
            String::new(),
        );

        assert!(!applied);
        assert_eq!(lobby.members()[0].score, 100);
    }

    // =====================================================================
    // Terminal state
    // =====================================================================

    #[test]
    fn test_finished_lobby_blocks_progress_for_good() {
        let mut lobby = MultiplayerSession::new(code(), "ada", true);
        lobby.begin_round(question(100), vec![member("ada", 0)]);
        lobby.mark_finished();

        assert!(lobby.is_finished());
        assert!(!lobby.may_progress());
    }
}
