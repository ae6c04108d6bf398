//! Recording mocks for the calendar, task-list and mail gateways

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use intentrelay_core::{
    CalendarGateway, CreatedEvent, CreatedTask, MailGateway, NewCalendarEvent, NewTask,
    SentMessage, TaskGateway,
};
use intentrelay_domain::{IntentRelayError, Result as DomainResult};

/// How a mock gateway answers
#[derive(Clone, Default)]
pub enum Behaviour {
    #[default]
    Succeed,
    Fail(IntentRelayError),
    Panic,
}

/// Records every call together with the access token it carried.
#[derive(Clone, Default)]
pub struct RecordingCalendar {
    pub calls: Arc<Mutex<Vec<(String, NewCalendarEvent)>>>,
    behaviour: Arc<Mutex<Behaviour>>,
}

impl RecordingCalendar {
    pub fn behave(&self, behaviour: Behaviour) {
        *self.behaviour.lock().unwrap() = behaviour;
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl CalendarGateway for RecordingCalendar {
    async fn insert_event(
        &self,
        access_token: &str,
        event: &NewCalendarEvent,
    ) -> DomainResult<CreatedEvent> {
        self.calls.lock().unwrap().push((access_token.to_string(), event.clone()));
        let behaviour = self.behaviour.lock().unwrap().clone();
        match behaviour {
            Behaviour::Succeed => Ok(CreatedEvent {
                id: format!("evt-{}", self.call_count()),
                summary: event.summary.clone(),
                start: event.start,
                end: event.end,
            }),
            Behaviour::Fail(err) => Err(err),
            Behaviour::Panic => panic!("calendar gateway exploded"),
        }
    }
}

#[derive(Clone, Default)]
pub struct RecordingTasks {
    pub calls: Arc<Mutex<Vec<(String, NewTask)>>>,
    behaviour: Arc<Mutex<Behaviour>>,
}

impl RecordingTasks {
    pub fn behave(&self, behaviour: Behaviour) {
        *self.behaviour.lock().unwrap() = behaviour;
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl TaskGateway for RecordingTasks {
    async fn insert_task(&self, access_token: &str, task: &NewTask) -> DomainResult<CreatedTask> {
        self.calls.lock().unwrap().push((access_token.to_string(), task.clone()));
        let behaviour = self.behaviour.lock().unwrap().clone();
        match behaviour {
            Behaviour::Succeed => Ok(CreatedTask {
                id: format!("task-{}", self.call_count()),
                title: task.title.clone(),
                due: task.due.map(|due| format!("{due}T00:00:00.000Z")),
                status: task.status.clone(),
            }),
            Behaviour::Fail(err) => Err(err),
            Behaviour::Panic => panic!("task gateway exploded"),
        }
    }
}

#[derive(Clone, Default)]
pub struct RecordingMail {
    pub calls: Arc<Mutex<Vec<(String, String)>>>,
    behaviour: Arc<Mutex<Behaviour>>,
}

impl RecordingMail {
    pub fn behave(&self, behaviour: Behaviour) {
        *self.behaviour.lock().unwrap() = behaviour;
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl MailGateway for RecordingMail {
    async fn send_raw(&self, access_token: &str, raw: &str) -> DomainResult<SentMessage> {
        self.calls.lock().unwrap().push((access_token.to_string(), raw.to_string()));
        let behaviour = self.behaviour.lock().unwrap().clone();
        match behaviour {
            Behaviour::Succeed => Ok(SentMessage {
                id: format!("msg-{}", self.call_count()),
                thread_id: "thread-1".to_string(),
            }),
            Behaviour::Fail(err) => Err(err),
            Behaviour::Panic => panic!("mail gateway exploded"),
        }
    }
}
