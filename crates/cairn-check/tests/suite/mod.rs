mod agents;
mod options;
