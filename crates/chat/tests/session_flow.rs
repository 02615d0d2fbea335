use std::time::Duration;

use moped_chat::{
    ChatState, DEFAULT_BOT_REPLY, Message, ReplyPolicy, ViewState, reply_channel, send,
};

fn stage(state: &mut ChatState, text: &str) {
    state.input.set(text);
}

#[tokio::test(start_paused = true)]
async fn hello_gets_a_bot_reply_after_one_second() {
    let mut state = ChatState::new(ViewState::default());
    let policy = ReplyPolicy::default();
    let (scheduler, mut replies) = reply_channel();

    stage(&mut state, "Hello");
    let pending = send(&mut state.session, &mut state.input, &policy).expect("not blank");
    tokio::spawn(scheduler.schedule(pending));

    assert_eq!(
        state.session.threads()[0].messages,
        vec![Message::user("Hello")]
    );

    tokio::time::advance(Duration::from_millis(1000)).await;
    let reply = replies.recv().await.expect("reply scheduled");
    reply.deliver(&mut state.session).expect("thread 0 exists");

    assert_eq!(
        state.session.threads()[0].messages,
        vec![Message::user("Hello"), Message::bot(DEFAULT_BOT_REPLY)]
    );
}

#[tokio::test(start_paused = true)]
async fn switching_threads_before_the_delay_keeps_reply_in_origin_thread() {
    let mut state = ChatState::new(ViewState::default());
    let policy = ReplyPolicy::default();
    let (scheduler, mut replies) = reply_channel();

    stage(&mut state, "from A");
    let pending = send(&mut state.session, &mut state.input, &policy).expect("not blank");
    tokio::spawn(scheduler.schedule(pending));

    state.session.new_thread();
    state.session.select_thread(1).expect("thread B exists");

    let reply = replies.recv().await.expect("reply scheduled");
    reply.deliver(&mut state.session).expect("thread A exists");

    assert_eq!(state.session.active_index(), 1);
    assert_eq!(state.session.threads()[0].len(), 2);
    assert!(state.session.threads()[1].is_empty());
}

#[tokio::test(start_paused = true)]
async fn overlapping_sends_across_threads_stay_in_their_threads() {
    let mut state = ChatState::new(ViewState::default());
    let policy = ReplyPolicy::new("pong", Duration::from_millis(1000));
    let (scheduler, mut replies) = reply_channel();

    stage(&mut state, "ping 1");
    let first = send(&mut state.session, &mut state.input, &policy).expect("not blank");
    tokio::spawn(scheduler.schedule(first));

    tokio::time::advance(Duration::from_millis(300)).await;
    state.session.new_thread();
    stage(&mut state, "ping 2");
    let second = send(&mut state.session, &mut state.input, &policy).expect("not blank");
    tokio::spawn(scheduler.schedule(second));

    for _ in 0..2 {
        let reply = replies.recv().await.expect("reply scheduled");
        reply.deliver(&mut state.session).expect("thread exists");
    }

    for (index, prompt) in ["ping 1", "ping 2"].into_iter().enumerate() {
        assert_eq!(
            state.session.threads()[index].messages,
            vec![Message::user(prompt), Message::bot("pong")]
        );
    }
}

#[test]
fn two_new_threads_from_a_fresh_session() {
    let mut state = ChatState::new(ViewState::default());
    stage(&mut state, "first");
    send(&mut state.session, &mut state.input, &ReplyPolicy::default()).expect("not blank");
    let before = state.session.threads()[0].clone();

    state.session.new_thread();
    state.session.new_thread();

    assert_eq!(state.session.len(), 3);
    assert_eq!(state.session.active_index(), 2);
    assert_eq!(state.session.threads()[0], before);
    assert!(state.session.threads()[1].is_empty());
}
