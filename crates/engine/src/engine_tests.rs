use super::*;
use coswarm_adapters::FakeProvider;
use coswarm_core::{Command, CommandKind, CommandSource, FakeClock};
use parking_lot::Mutex;

struct CollectingSink {
    effects: Mutex<Vec<Effect>>,
}

impl EffectSink for CollectingSink {
    fn accept(&self, effects: Vec<Effect>) {
        self.effects.lock().extend(effects);
    }
}

#[tokio::test]
async fn starting_a_workflow_runs_its_command_processor() {
    let workflow = WorkflowInstance::builder().build();
    let workflow_id = workflow.id;
    let clock: Arc<dyn Clock> = Arc::new(FakeClock::new(0));
    let provider: Arc<dyn Provider> = Arc::new(FakeProvider::new());
    let sink = Arc::new(CollectingSink { effects: Mutex::new(Vec::new()) });
    let (engine, _join) = Engine::start(workflow, clock, provider, sink.clone());

    engine
        .handle
        .submit(Command::new(workflow_id, CommandSource::ControlPlane, CommandKind::StartWorkflow, 0))
        .await
        .expect("submit");

    tokio::time::sleep(std::time::Duration::from_millis(10)).await;
    assert_eq!(engine.workflow, workflow_id);
}
